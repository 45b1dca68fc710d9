//! Watch mode.
//! Rebuilds the theme whenever its sources change. Bursts of filesystem
//! events are collapsed into a single rebuild.

use crate::constants::{SRC_DIR, WATCH_IGNORED_DIRS};
use crate::error::{Error, Result};
use log::{debug, error, info};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Quiet period that ends a burst of events.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Whether an event should trigger a rebuild.
///
/// Access events and changes inside ignored directories (`dist`,
/// `node_modules`) are not relevant. Only the components below
/// `theme_root` are checked, so a theme living under a directory named
/// `dist` still rebuilds. Paths outside `theme_root` come from the watched
/// tree anyway and count as relevant.
pub fn is_relevant_change(event: &Event, theme_root: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_) | EventKind::Other) {
        return false;
    }
    let root = std::path::absolute(theme_root).unwrap_or_else(|_| theme_root.to_path_buf());
    event.paths.iter().any(|path| {
        let relative = match path.strip_prefix(&root).or_else(|_| path.strip_prefix(theme_root)) {
            Ok(relative) => relative,
            Err(_) => return true,
        };
        !relative.components().any(|c| {
            WATCH_IGNORED_DIRS.iter().any(|ignored| c.as_os_str() == *ignored)
        })
    })
}

fn watcher_stopped() -> Error {
    Error::WatchError(notify::Error::generic("file watcher stopped"))
}

/// Waits until `rx` stays silent for [`DEBOUNCE`], reporting whether any of
/// the received events was relevant.
fn drain_burst(rx: &Receiver<Event>, theme_root: &Path, mut relevant: bool) -> Result<bool> {
    loop {
        match rx.recv_timeout(DEBOUNCE) {
            Ok(event) => relevant |= is_relevant_change(&event, theme_root),
            Err(RecvTimeoutError::Timeout) => return Ok(relevant),
            Err(RecvTimeoutError::Disconnected) => return Err(watcher_stopped()),
        }
    }
}

/// Watches `<theme_root>/src` and calls `rebuild` after every relevant
/// change. Failed rebuilds are logged and watching continues.
///
/// Runs until the process is terminated or the watcher fails.
pub fn watch<F>(theme_root: &Path, mut rebuild: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    // Event paths are absolute and symlink-free, so compare against the same form
    let theme_root = &theme_root.canonicalize()?;
    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let src = theme_root.join(SRC_DIR);
    watcher.watch(&src, RecursiveMode::Recursive)?;
    info!("Watching {} for changes (Ctrl+C to stop)", src.display());

    loop {
        let first = rx.recv().map_err(|_| watcher_stopped())?;
        let relevant = is_relevant_change(&first, theme_root);
        if !drain_burst(&rx, theme_root, relevant)? {
            debug!("Ignoring irrelevant filesystem events");
            continue;
        }

        info!("Change detected, rebuilding");
        if let Err(e) = rebuild() {
            error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;
    use std::sync::mpsc::Sender;

    fn modify(path: PathBuf) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path)
    }

    fn send_all(tx: &Sender<Event>, events: Vec<Event>) {
        for event in events {
            tx.send(event).unwrap();
        }
    }

    #[test]
    fn test_modification_in_src_is_relevant() {
        let root = PathBuf::from("/theme");
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(root.join("src").join("style.css"));
        assert!(is_relevant_change(&event, &root));
    }

    #[test]
    fn test_ignored_directories() {
        let root = PathBuf::from("/theme");
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(root.join("src").join("node_modules").join("x.js"));
        assert!(!is_relevant_change(&event, &root));

        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(root.join("dist").join("style.css"));
        assert!(!is_relevant_change(&event, &root));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let root = PathBuf::from("/theme");
        let event = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(root.join("src").join("style.css"));
        assert!(!is_relevant_change(&event, &root));
    }

    #[test]
    fn test_theme_below_ignored_directory_name() {
        let root = PathBuf::from("/home/u/dist/mytheme");
        let event = modify(root.join("src").join("style.css"));
        assert!(is_relevant_change(&event, &root));

        let event = modify(root.join("src").join("node_modules").join("x.js"));
        assert!(!is_relevant_change(&event, &root));
    }

    #[test]
    fn test_absolute_event_with_relative_root() {
        let event = modify(PathBuf::from("/home/u/dist/mytheme/src/style.css"));
        assert!(is_relevant_change(&event, Path::new(".")));

        let cwd = std::env::current_dir().unwrap();
        let event = modify(cwd.join("dist").join("style.css"));
        assert!(!is_relevant_change(&event, Path::new(".")));

        let event = modify(cwd.join("src").join("style.css"));
        assert!(is_relevant_change(&event, Path::new(".")));
    }

    #[test]
    fn test_burst_collapses_into_one_result() {
        let root = PathBuf::from("/theme");
        let (tx, rx) = channel();
        send_all(
            &tx,
            vec![
                modify(root.join("dist").join("style.css")),
                modify(root.join("src").join("style.css")),
                modify(root.join("src").join("functions.php")),
            ],
        );

        assert!(drain_burst(&rx, &root, false).unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_burst_of_ignored_changes() {
        let root = PathBuf::from("/theme");
        let (tx, rx) = channel();
        send_all(
            &tx,
            vec![
                modify(root.join("dist").join("style.css")),
                Event::new(EventKind::Access(AccessKind::Any)).add_path(root.join("src")),
            ],
        );

        assert!(!drain_burst(&rx, &root, false).unwrap());
    }

    #[test]
    fn test_disconnected_watcher() {
        let root = PathBuf::from("/theme");
        let (tx, rx) = channel();
        tx.send(modify(root.join("src").join("style.css"))).unwrap();
        drop(tx);

        let err = drain_burst(&rx, &root, false).unwrap_err();
        assert!(matches!(err, Error::WatchError(_)));
    }
}
