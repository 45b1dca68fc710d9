//! WordPress theme header handling.
//! A theme's main stylesheet starts with a comment of `Key: value` lines
//! (`Theme Name`, `Version`, ...) that WordPress reads as theme metadata.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;

/// Header fields recognised in a theme stylesheet.
pub const THEME_HEADER_FIELDS: [&str; 13] = [
    "Theme Name",
    "Theme URI",
    "Author",
    "Author URI",
    "Description",
    "Version",
    "Requires at least",
    "Tested up to",
    "Requires PHP",
    "License",
    "License URI",
    "Text Domain",
    "Tags",
];

fn field_regex(key: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?m)^[ \t*]*({}):[ \t]*(.+?)[ \t]*$", regex::escape(key)))
        .map_err(|e| Error::TemplateError(e.to_string()))
}

/// Parses the theme header of a stylesheet.
///
/// Fields that are absent are left out of the result.
pub fn parse_theme_metadata(stylesheet: &str) -> Result<IndexMap<String, String>> {
    let mut metadata = IndexMap::new();
    for key in THEME_HEADER_FIELDS {
        match field_regex(key)?.captures(stylesheet) {
            Some(captures) => {
                metadata.insert(key.to_string(), captures[2].to_string());
            }
            None => debug!("Theme header field '{}' not found", key),
        }
    }
    Ok(metadata)
}

/// Rewrites the value of each header field present in `replacements`.
/// Fields missing from the stylesheet are not added.
pub fn replace_theme_metadata(
    stylesheet: &str,
    replacements: &IndexMap<&str, String>,
) -> Result<String> {
    let mut content = stylesheet.to_string();
    for (key, value) in replacements {
        let regex = field_regex(key)?;
        let Some(range) = regex.captures(&content).and_then(|c| c.get(2)).map(|m| m.range())
        else {
            debug!("Theme header field '{}' not present, not replaced", key);
            continue;
        };
        content.replace_range(range, value);
    }
    Ok(content)
}
