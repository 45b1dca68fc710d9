//! Theme build processing.
//! A build is planned as a list of file operations (stylesheet with the
//! version substituted, script entry, copy patterns), applied to a clean
//! `dist` directory and then mirrored into the WordPress install.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{SCRIPT_SOURCE, SCRIPT_TARGET, STYLESHEET_SOURCE, STYLESHEET_TARGET};
use crate::error::{Error, Result};
use crate::metadata::parse_theme_metadata;
use crate::patterns::{CopyPattern, DEFAULT_COPY_PATTERNS};
use crate::renderer::{version_context, TemplateRenderer};
use crate::resolver::BuildPlan;

/// A single change to the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Copy a file as is
    Copy { source: PathBuf, target: PathBuf },
    /// Write rendered content
    Write { target: PathBuf, content: String },
}

impl FileOperation {
    pub fn target(&self) -> &Path {
        match self {
            FileOperation::Copy { target, .. } | FileOperation::Write { target, .. } => target,
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(path, content).map_err(Error::IoError)
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::copy(source, dest).map(|_| ()).map_err(Error::IoError)
}

/// Applies a file operation, creating parent directories as needed.
///
/// # Returns
/// * `Result<PathBuf>` - The path that was written
pub fn apply_operation(operation: &FileOperation) -> Result<PathBuf> {
    match operation {
        FileOperation::Copy { source, target } => {
            debug!("Copying file: {} -> {}", source.display(), target.display());
            copy_file(source, target)?;
        }
        FileOperation::Write { target, content } => {
            debug!("Writing file: {}", target.display());
            write_file(target, content)?;
        }
    }
    Ok(operation.target().to_path_buf())
}

/// Plans the copy of every file under `source` into `destination`.
pub fn mirror_operations(source: &Path, destination: &Path) -> Result<Vec<FileOperation>> {
    let mut operations = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        operations.push(FileOperation::Copy {
            source: entry.path().to_path_buf(),
            target: destination.join(relative),
        });
    }
    Ok(operations)
}

/// Outcome of a build.
#[derive(Debug)]
pub struct BuildReport {
    pub plan: BuildPlan,
    pub version: String,
    /// Files written into `dist`
    pub written: Vec<PathBuf>,
    /// Files written into the WordPress install
    pub mirrored: Vec<PathBuf>,
    /// Distribution archive of `dist`, when one was requested
    pub archive: Option<PathBuf>,
}

/// Builds a theme project into `dist` and its WordPress mirror.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    theme_root: &'a Path,
    patterns: &'a [CopyPattern],
}

impl<'a> Processor<'a> {
    /// Creates a processor using the default copy patterns.
    pub fn new(renderer: &'a dyn TemplateRenderer, theme_root: &'a Path) -> Self {
        Self::with_patterns(renderer, theme_root, &DEFAULT_COPY_PATTERNS)
    }

    pub fn with_patterns(
        renderer: &'a dyn TemplateRenderer,
        theme_root: &'a Path,
        patterns: &'a [CopyPattern],
    ) -> Self {
        Self { renderer, theme_root, patterns }
    }

    pub fn dist_root(&self, plan: &BuildPlan) -> PathBuf {
        self.theme_root.join(&plan.dist_path)
    }

    pub fn wordpress_root(&self, plan: &BuildPlan) -> PathBuf {
        self.theme_root.join(&plan.wordpress_dist_path)
    }

    fn required_source(&self, relative: &str) -> Result<PathBuf> {
        let path = self.theme_root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::MissingAssetError { pattern: relative.to_string() })
        }
    }

    /// Plans every operation that fills `dist`, without touching the filesystem
    /// beyond reading sources.
    ///
    /// # Errors
    /// * `Error::MissingAssetError` if the stylesheet, the script entry or a
    ///   required copy pattern has no source
    pub fn plan_operations(&self, plan: &BuildPlan, version: &str) -> Result<Vec<FileOperation>> {
        let dist_root = self.dist_root(plan);
        let mut operations = Vec::new();

        let stylesheet = fs::read_to_string(self.required_source(STYLESHEET_SOURCE)?)?;
        operations.push(FileOperation::Write {
            target: dist_root.join(STYLESHEET_TARGET),
            content: self.renderer.render(&stylesheet, &version_context(version))?,
        });

        operations.push(FileOperation::Copy {
            source: self.required_source(SCRIPT_SOURCE)?,
            target: dist_root.join(SCRIPT_TARGET),
        });

        for pattern in self.patterns {
            operations.extend(pattern.evaluate(self.theme_root, &dist_root)?);
        }

        Ok(operations)
    }

    fn check_stylesheet_version(&self, operations: &[FileOperation], version: &str) -> Result<()> {
        let stylesheet = operations.iter().find_map(|op| match op {
            FileOperation::Write { target, content } if target.ends_with(STYLESHEET_TARGET) => {
                Some(content)
            }
            _ => None,
        });
        if let Some(content) = stylesheet {
            let metadata = parse_theme_metadata(content)?;
            match metadata.get("Version") {
                Some(header) if header != version => warn!(
                    "Stylesheet declares version '{}' but package.json has '{}'",
                    header, version
                ),
                None => warn!("Stylesheet has no Version header"),
                _ => {}
            }
        }
        Ok(())
    }

    /// Runs a full build: clean `dist`, apply the planned operations, mirror
    /// `dist` into the WordPress install.
    pub fn build(&self, plan: &BuildPlan, version: &str) -> Result<BuildReport> {
        let operations = self.plan_operations(plan, version)?;
        self.check_stylesheet_version(&operations, version)?;

        let dist_root = self.dist_root(plan);
        if dist_root.exists() {
            debug!("Cleaning {}", dist_root.display());
            fs::remove_dir_all(&dist_root)?;
        }

        let written =
            operations.iter().map(apply_operation).collect::<Result<Vec<PathBuf>>>()?;
        info!("Wrote {} files to {}", written.len(), dist_root.display());

        let wordpress_root = self.wordpress_root(plan);
        let mirrored = mirror_operations(&dist_root, &wordpress_root)?
            .iter()
            .map(apply_operation)
            .collect::<Result<Vec<PathBuf>>>()?;
        info!("Mirrored {} files to {}", mirrored.len(), wordpress_root.display());

        Ok(BuildReport {
            plan: plan.clone(),
            version: version.to_string(),
            written,
            mirrored,
            archive: None,
        })
    }
}
