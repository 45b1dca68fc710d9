//! Copy patterns for theme assets.
//! Each pattern selects files under the theme project and maps them into the
//! build output, dropping the `src/` prefix.

use crate::error::{Error, Result};
use crate::processor::FileOperation;
use globset::GlobBuilder;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A set of theme files copied verbatim into the build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPattern {
    /// Directory the search starts from, relative to the theme project
    pub base: &'static str,
    /// Glob matched against paths relative to the theme project
    pub glob: &'static str,
    /// Prefix removed from the relative path to build the target path
    pub strip_prefix: Option<&'static str>,
    /// When true, matching nothing is not an error
    pub optional: bool,
}

/// Files every theme build copies.
pub const DEFAULT_COPY_PATTERNS: [CopyPattern; 5] = [
    CopyPattern {
        base: "src",
        glob: "src/composer.json",
        strip_prefix: Some("src/"),
        optional: false,
    },
    CopyPattern {
        base: "src",
        glob: "src/**/*.php",
        strip_prefix: Some("src/"),
        optional: false,
    },
    CopyPattern {
        base: ".",
        glob: "screenshot.png",
        strip_prefix: None,
        optional: true,
    },
    CopyPattern {
        base: "src/assets/images",
        glob: "src/assets/images/**/*.{png,jpg,jpeg,gif,svg,webp}",
        strip_prefix: Some("src/"),
        optional: true,
    },
    CopyPattern {
        base: "src/assets/fonts",
        glob: "src/assets/fonts/**/*.{ttf,otf,eot,woff,woff2,svg}",
        strip_prefix: Some("src/"),
        optional: true,
    },
];

/// Relative path with `/` separators, as globs expect.
pub(crate) fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl CopyPattern {
    fn is_literal(&self) -> bool {
        !self.glob.contains(['*', '?', '[', '{'])
    }

    fn target_for(&self, relative: &str, dist_root: &Path) -> PathBuf {
        let target = self
            .strip_prefix
            .and_then(|prefix| relative.strip_prefix(prefix))
            .unwrap_or(relative);
        dist_root.join(target)
    }

    fn nothing_matched(&self) -> Result<Vec<FileOperation>> {
        if self.optional {
            debug!("Optional pattern '{}' matched nothing, skipping", self.glob);
            Ok(Vec::new())
        } else {
            Err(Error::MissingAssetError { pattern: self.glob.to_string() })
        }
    }

    /// Plans the copy operations of this pattern.
    ///
    /// # Arguments
    /// * `theme_root` - Theme project directory
    /// * `dist_root` - Build output directory
    ///
    /// # Returns
    /// * `Result<Vec<FileOperation>>` - Copy operations sorted by source path
    ///
    /// # Errors
    /// * `Error::MissingAssetError` if a required pattern matches nothing
    /// * `Error::PatternError` if the glob is invalid
    pub fn evaluate(&self, theme_root: &Path, dist_root: &Path) -> Result<Vec<FileOperation>> {
        if self.is_literal() {
            let source = theme_root.join(self.glob);
            if !source.is_file() {
                return self.nothing_matched();
            }
            return Ok(vec![FileOperation::Copy {
                target: self.target_for(self.glob, dist_root),
                source,
            }]);
        }

        let base = theme_root.join(self.base);
        if !base.is_dir() {
            return self.nothing_matched();
        }

        let matcher = GlobBuilder::new(self.glob)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        let mut operations = Vec::new();
        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(theme_root)
                .map_err(|e| Error::PatternError(e.to_string()))?;
            let relative = to_slash_path(relative);
            // WalkDir on "." yields "./x" paths
            let relative = relative.strip_prefix("./").unwrap_or(&relative).to_string();

            if matcher.is_match(&relative) {
                operations.push(FileOperation::Copy {
                    target: self.target_for(&relative, dist_root),
                    source: entry.path().to_path_buf(),
                });
            }
        }

        if operations.is_empty() {
            return self.nothing_matched();
        }
        Ok(operations)
    }
}
