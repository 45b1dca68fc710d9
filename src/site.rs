//! Site configuration handling.
//! Loads the `site.json` document shared by the WordPress project and its
//! themes, validates it against the embedded schema and exposes the declared
//! environments.

use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimal schema for the parts of the site configuration this tool reads.
const SITE_SCHEMA: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "type": "object",
    "required": ["environments"],
    "properties": {
        "environments": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["name", "wp_config"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "type": { "type": "string" },
                    "base_url": { "type": "string" },
                    "wp_config": {
                        "type": "object",
                        "required": ["content_url"],
                        "properties": {
                            "content_url": {
                                "type": "object",
                                "required": ["value"],
                                "properties": { "value": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "settings": {
            "type": "object",
            "properties": {
                "themes": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string" },
                            "tags": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                }
            }
        }
    }
}"#;

/// A single `wp_config` entry; only its value is relevant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSetting {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpConfig {
    pub content_url: ConfigSetting,
}

/// A named deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub wp_config: WpConfig,
}

impl Environment {
    /// URL path fragment of the WordPress content directory.
    pub fn content_url(&self) -> &str {
        &self.wp_config.content_url.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// A theme entry of `settings.themes`.
///
/// The development theme is the one whose `source_type` is `src`; its
/// `source` is the directory (and slug) of the theme project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub project: Option<ProjectSettings>,
    #[serde(default)]
    pub themes: Vec<ThemeSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub settings: Option<SiteSettings>,
}

/// Kinds of environment a site declares through the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentType {
    Development,
    Staging,
    Production,
}

impl EnvironmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::Development => "development",
            EnvironmentType::Staging => "staging",
            EnvironmentType::Production => "production",
        }
    }
}

impl std::fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SiteConfig {
    /// Names of every declared environment, in declaration order.
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name.as_str()).collect()
    }

    /// Returns the only environment of the given type.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no environment or more than one has that type
    pub fn environment_by_type(&self, environment_type: EnvironmentType) -> Result<&Environment> {
        let matches: Vec<&Environment> = self
            .environments
            .iter()
            .filter(|e| e.environment_type.as_deref() == Some(environment_type.as_str()))
            .collect();

        match matches.as_slice() {
            [environment] => Ok(*environment),
            [] => Err(Error::ConfigError(format!(
                "no environment of type '{}' found",
                environment_type
            ))),
            _ => Err(Error::ConfigError(format!(
                "{} environments of type '{}' found, expected one",
                matches.len(),
                environment_type
            ))),
        }
    }

    /// Project version declared in `settings.project.version`, if any.
    pub fn project_version(&self) -> Option<&str> {
        self.project().and_then(|p| p.version.as_deref())
    }

    /// Project name declared in `settings.project.name`, if any.
    pub fn project_name(&self) -> Option<&str> {
        self.project().and_then(|p| p.name.as_deref())
    }

    /// The only theme with `source_type: src`, if there is exactly one.
    pub fn src_theme(&self) -> Option<&ThemeSettings> {
        let themes = self.settings.as_ref().map(|s| s.themes.as_slice()).unwrap_or_default();
        let matches: Vec<&ThemeSettings> = themes
            .iter()
            .filter(|t| t.source_type.as_deref() == Some("src"))
            .collect();

        match matches.as_slice() {
            [theme] => Some(*theme),
            [] => None,
            _ => {
                warn!("{} themes have source_type 'src', none is used", matches.len());
                None
            }
        }
    }

    fn project(&self) -> Option<&ProjectSettings> {
        self.settings.as_ref().and_then(|s| s.project.as_ref())
    }
}

/// Parses site configuration content.
/// JSON is tried first, YAML second; the result must satisfy the site schema.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither JSON nor YAML, or violates the schema
pub fn parse_site_config(content: &str) -> Result<SiteConfig> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid site configuration format: {}", e)))?,
    };

    validate_site_config(&value)?;

    Ok(serde_json::from_value(value)?)
}

/// Validates a site configuration value against the embedded schema.
///
/// # Errors
/// * `Error::ConfigError` listing every schema violation
pub fn validate_site_config(value: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(SITE_SCHEMA)?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| Error::ConfigError(format!("invalid site schema: {}", e)))?;

    let problems: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "site configuration does not match schema: {}",
            problems.join("; ")
        )))
    }
}

/// Loads the site configuration from a file.
///
/// # Errors
/// * `Error::ConfigError` if the file does not exist or is invalid
pub fn load_site_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "Site configuration not found: {}",
            path.display()
        )));
    }

    debug!("Loading site configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let config = parse_site_config(&content)?;

    let names = config.environment_names();
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            warn!("Environment '{}' is declared more than once; the first one is used", name);
        }
    }

    Ok(config)
}
