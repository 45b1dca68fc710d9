//! Theme distribution archives.
//! Packs the built `dist` directory into a zip file that can be uploaded to
//! any WordPress install.

use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::patterns::to_slash_path;

/// Zips every file under `directory` into `archive_path`.
///
/// Entry names are relative to `directory` and use `/` separators; the
/// directory itself is not part of the archive.
///
/// # Returns
/// * `Result<Vec<String>>` - The archive entry names, in the order written
pub fn zip_directory(directory: &Path, archive_path: &Path) -> Result<Vec<String>> {
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(directory)
            .map_err(|e| Error::ArchiveError(e.to_string()))?;
        let name = to_slash_path(relative);

        writer.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(entry.path())?, &mut writer)?;
        debug!("Added {} to {}", name, archive_path.display());
        entries.push(name);
    }

    writer.finish()?;
    Ok(entries)
}

/// Archive location for a theme: `<theme_root>/<theme_slug>.zip`.
pub fn archive_path(theme_root: &Path, theme_slug: &str) -> PathBuf {
    theme_root.join(format!("{}.zip", theme_slug))
}
