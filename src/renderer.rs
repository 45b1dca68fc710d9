//! Placeholder rendering for theme templates.
//! Templates use literal `{{token}}` placeholders; token names may contain
//! dashes (`{{theme-name}}`), so rendering is plain substitution rather than
//! an expression language.
use crate::error::{Error, Result};
use cruet::Inflector;
use regex::Regex;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - JSON object mapping token names to values
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// Literal `{{token}}` substitution.
///
/// The template is scanned once from left to right. Tokens missing from the
/// context stay as they are and substituted values are not scanned again.
#[derive(Debug, Default)]
pub struct TokenRenderer;

impl TokenRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn token_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => {
            items.iter().map(token_value).collect::<Vec<_>>().join(",")
        }
        other => other.to_string(),
    }
}

impl TemplateRenderer for TokenRenderer {
    /// # Errors
    /// * `Error::TemplateError` if the context is not a JSON object
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let tokens = context.as_object().ok_or_else(|| {
            Error::TemplateError("render context must be an object".to_string())
        })?;

        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => match tokens.get(&after[..end]) {
                    Some(value) => {
                        output.push_str(&token_value(value));
                        rest = &after[end + 2..];
                    }
                    None => {
                        // Unknown token: keep one brace and rescan from the next one
                        output.push('{');
                        rest = &rest[start + 1..];
                    }
                },
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);

        Ok(output)
    }
}

/// Context that substitutes `{{version}}` only.
pub fn version_context(version: &str) -> serde_json::Value {
    serde_json::json!({ "version": version })
}

/// Theme slug spelled in each casing the default templates use.
pub fn theme_name_tokens(slug: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut tokens = serde_json::Map::new();
    tokens.insert("theme-name".to_string(), slug.into());
    tokens.insert("theme_name".to_string(), slug.to_snake_case().into());
    tokens.insert("themeName".to_string(), slug.to_camel_case().into());
    tokens.insert("ThemeName".to_string(), slug.to_pascal_case().into());
    tokens.insert("THEME_NAME".to_string(), slug.to_screaming_snake_case().into());
    tokens
}

/// Replaces the legacy `mytheme_` function prefix in PHP sources with the
/// snake-cased theme slug.
pub fn replace_mytheme_prefix(content: &str, slug: &str) -> Result<String> {
    let regex = Regex::new(r"\bmytheme_").map_err(|e| Error::TemplateError(e.to_string()))?;
    let replacement = format!("{}_", slug.to_snake_case());
    Ok(regex.replace_all(content, regex::NoExpand(&replacement)).into_owned())
}
