//! Environment path resolution.
//! Turns a requested environment name and the site's environments into the
//! build mode and the output paths of a single build.

use crate::constants::{
    DEFAULT_ENVIRONMENT, DEFAULT_THEME_SLUG, DEFAULT_WORDPRESS_PATH, DIST_DIR, THEMES_DIR,
};
use crate::error::{Error, Result};
use crate::site::Environment;
use log::{debug, warn};
use serde::Serialize;

/// Build mode derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Development => write!(f, "development"),
            Mode::Production => write!(f, "production"),
        }
    }
}

/// Fixed parts of the WordPress mirror path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    /// Location of the WordPress install, relative to the theme project or absolute
    pub wordpress_path: String,
    pub theme_slug: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            wordpress_path: DEFAULT_WORDPRESS_PATH.to_string(),
            theme_slug: DEFAULT_THEME_SLUG.to_string(),
        }
    }
}

/// Mode and paths driving a single build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub environment: String,
    pub mode: Mode,
    pub dist_path: String,
    pub wordpress_dist_path: String,
}

/// Resolves the build plan for the requested environment.
///
/// An absent or empty name means `localhost`. The first environment with a
/// matching name wins.
///
/// # Errors
/// * `Error::EnvironmentNotFound` if no environment has the requested name
pub fn resolve(
    requested: Option<&str>,
    environments: &[Environment],
    settings: &PathSettings,
) -> Result<BuildPlan> {
    let name = requested.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_ENVIRONMENT);

    let mut matching = environments.iter().filter(|e| e.name == name);
    let environment = matching.next().ok_or_else(|| Error::EnvironmentNotFound {
        environment: name.to_string(),
        available: environments
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })?;
    if matching.next().is_some() {
        warn!("Environment '{}' found more than once; using the first one", name);
    }

    let mode = if name == DEFAULT_ENVIRONMENT { Mode::Development } else { Mode::Production };

    let wordpress_dist_path = format!(
        "{}{}/{}/{}",
        settings.wordpress_path.trim_end_matches('/'),
        environment.content_url(),
        THEMES_DIR,
        settings.theme_slug
    );

    debug!("Resolved environment '{}' ({}) to '{}'", name, mode, wordpress_dist_path);

    Ok(BuildPlan {
        environment: name.to_string(),
        mode,
        dist_path: DIST_DIR.to_string(),
        wordpress_dist_path,
    })
}
