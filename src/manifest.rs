use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// The fields of a theme's `package.json` this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl PackageManifest {
    /// Version substituted for `{{version}}` during builds.
    ///
    /// # Errors
    /// * `Error::ManifestError` if the version is missing or blank
    pub fn version(&self) -> Result<&str> {
        match self.version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => Ok(version),
            _ => Err(Error::ManifestError("no version declared in package.json".to_string())),
        }
    }
}

// Reads the package manifest at `path`.
pub fn read_package_manifest<P: AsRef<Path>>(path: P) -> Result<PackageManifest> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ManifestError(format!(
            "package manifest not found: {}",
            path.display()
        )));
    }

    debug!("Reading package manifest {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
