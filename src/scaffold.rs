//! Theme project scaffolding.
//! Writes the default theme files into a theme project with the theme
//! identifiers substituted. `{{version}}` is left in place for build time.

use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

use crate::constants::{BROWSERSYNC_CONFIG, PACKAGE_MANIFEST, STYLESHEET_SCSS, STYLESHEET_SOURCE};
use crate::error::{Error, Result};
use crate::metadata::replace_theme_metadata;
use crate::processor::{apply_operation, FileOperation};
use crate::prompt::Prompter;
use crate::renderer::{replace_mytheme_prefix, theme_name_tokens, TemplateRenderer};
use crate::site::ThemeSettings;

/// A template shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFile {
    /// Destination, relative to the theme project
    pub path: &'static str,
    pub content: &'static str,
}

pub static DEFAULT_FILES: [DefaultFile; 11] = [
    DefaultFile {
        path: PACKAGE_MANIFEST,
        content: include_str!("../default-files/default-package.json"),
    },
    DefaultFile {
        path: "webpack.config.js",
        content: include_str!("../default-files/default-webpack.config.js"),
    },
    DefaultFile {
        path: BROWSERSYNC_CONFIG,
        content: include_str!("../default-files/default-browsersync.config.js"),
    },
    DefaultFile {
        path: "src/composer.json",
        content: include_str!("../default-files/default-composer.json"),
    },
    DefaultFile {
        path: STYLESHEET_SOURCE,
        content: include_str!("../default-files/default-style.css"),
    },
    DefaultFile {
        path: STYLESHEET_SCSS,
        content: include_str!("../default-files/default-style.scss"),
    },
    DefaultFile {
        path: "src/assets/ts/main.ts",
        content: include_str!("../default-files/default-main.ts"),
    },
    DefaultFile {
        path: "src/functions.php",
        content: include_str!("../default-files/default-functions.php"),
    },
    DefaultFile {
        path: "src/functions_php/functions-core.php",
        content: include_str!("../default-files/default-functions-core.php"),
    },
    DefaultFile {
        path: "src/functions_php/functions-toolset.php",
        content: include_str!("../default-files/default-functions-toolset.php"),
    },
    DefaultFile {
        path: "src/assets/js/main.js",
        content: include_str!("../default-files/default-main.js"),
    },
];

/// Looks up a default file by its destination path.
pub fn default_file(path: &str) -> Result<&'static DefaultFile> {
    DEFAULT_FILES
        .iter()
        .find(|f| f.path == path)
        .ok_or_else(|| Error::TemplateError(format!("no default file for '{}'", path)))
}

/// Values substituted into the default files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub theme_slug: String,
    pub project_name: String,
    pub project_version: String,
    pub dev_proxy: String,
    pub wordpress_theme_path: String,
    /// Development theme declared in the site configuration
    pub src_theme: Option<ThemeSettings>,
}

impl ScaffoldOptions {
    pub fn context(&self) -> serde_json::Value {
        let mut tokens = theme_name_tokens(&self.theme_slug);
        tokens.insert("project-name".to_string(), self.project_name.clone().into());
        tokens.insert("project-version".to_string(), self.project_version.clone().into());
        tokens.insert(
            "development-environment-base-url".to_string(),
            self.dev_proxy.clone().into(),
        );
        tokens.insert(
            "wordpress-theme-path".to_string(),
            self.wordpress_theme_path.clone().into(),
        );
        serde_json::Value::Object(tokens)
    }
}

/// Stylesheet header values for the scaffolded theme.
///
/// The development theme's name wins over the project name; its optional
/// fields are only written when declared.
pub fn theme_header(options: &ScaffoldOptions) -> IndexMap<&'static str, String> {
    let theme = options.src_theme.as_ref();
    let mut header = IndexMap::new();
    header.insert(
        "Theme Name",
        theme.map_or_else(|| options.project_name.clone(), |t| t.name.clone()),
    );
    header.insert("Text Domain", options.theme_slug.clone());

    let Some(theme) = theme else {
        return header;
    };
    let optional = [
        ("Description", theme.description.clone()),
        ("Theme URI", theme.uri.clone()),
        ("Author", theme.author.clone()),
        ("Author URI", theme.author_uri.clone()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            header.insert(key, value);
        }
    }
    if !theme.tags.is_empty() {
        header.insert("Tags", theme.tags.join(", "));
    }
    header
}

/// Rewrites the keys of a rendered `package.json` that the development
/// theme describes. Keys absent from the manifest are not added.
pub fn replace_package_metadata(manifest: &str, options: &ScaffoldOptions) -> Result<String> {
    let Some(theme) = &options.src_theme else {
        return Ok(manifest.to_string());
    };

    let mut replacements: IndexMap<&str, serde_json::Value> = IndexMap::new();
    replacements.insert("name", options.theme_slug.clone().into());
    if let Some(description) = &theme.description {
        replacements.insert("description", description.clone().into());
    }
    if !theme.tags.is_empty() {
        replacements.insert("keywords", theme.tags.clone().into());
    }
    let mut author = serde_json::Map::new();
    if let Some(name) = &theme.author {
        author.insert("name".to_string(), name.clone().into());
    }
    if let Some(url) = &theme.author_uri {
        author.insert("url".to_string(), url.clone().into());
    }
    if !author.is_empty() {
        replacements.insert("author", author.into());
    }

    let mut data: IndexMap<String, serde_json::Value> = serde_json::from_str(manifest)?;
    for (key, value) in data.iter_mut() {
        if let Some(replacement) = replacements.get(key.as_str()) {
            *value = replacement.clone();
        }
    }
    Ok(format!("{}\n", serde_json::to_string_pretty(&data)?))
}

/// Renders one default file with the scaffold substitutions applied.
pub fn render_default_file(
    renderer: &dyn TemplateRenderer,
    file: &DefaultFile,
    options: &ScaffoldOptions,
) -> Result<String> {
    let mut content = renderer.render(file.content, &options.context())?;

    if file.path.ends_with(".php") {
        content = replace_mytheme_prefix(&content, &options.theme_slug)?;
    }

    match file.path {
        STYLESHEET_SOURCE | STYLESHEET_SCSS => {
            content = replace_theme_metadata(&content, &theme_header(options))?;
        }
        PACKAGE_MANIFEST => content = replace_package_metadata(&content, options)?,
        _ => {}
    }

    Ok(content)
}

/// Files written and skipped by a scaffold run.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Writes the default theme files into a theme project.
pub struct Scaffolder<'a> {
    renderer: &'a dyn TemplateRenderer,
    prompt: &'a dyn Prompter,
    theme_root: &'a Path,
    skip_overwrite_check: bool,
}

impl<'a> Scaffolder<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        prompt: &'a dyn Prompter,
        theme_root: &'a Path,
        skip_overwrite_check: bool,
    ) -> Self {
        Self { renderer, prompt, theme_root, skip_overwrite_check }
    }

    /// Plans a write for every default file.
    pub fn plan_operations(&self, options: &ScaffoldOptions) -> Result<Vec<FileOperation>> {
        DEFAULT_FILES
            .iter()
            .map(|file| -> Result<FileOperation> {
                Ok(FileOperation::Write {
                    target: self.theme_root.join(file.path),
                    content: render_default_file(self.renderer, file, options)?,
                })
            })
            .collect()
    }

    /// Writes the default files. Existing files are only replaced once the
    /// prompter confirms it.
    pub fn scaffold(&self, options: &ScaffoldOptions) -> Result<ScaffoldReport> {
        let mut report = ScaffoldReport::default();

        for operation in self.plan_operations(options)? {
            let target = operation.target().to_path_buf();
            if target.exists() {
                let replace = self.prompt.confirm(
                    self.skip_overwrite_check,
                    format!("File '{}' already exists. Replace it?", target.display()),
                )?;
                if !replace {
                    debug!("Keeping existing file {}", target.display());
                    report.skipped.push(target);
                    continue;
                }
            }
            report.written.push(apply_operation(&operation)?);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::TokenRenderer;

    fn options() -> ScaffoldOptions {
        ScaffoldOptions {
            theme_slug: "ahead-labs".to_string(),
            project_name: "Ahead Labs".to_string(),
            project_version: "1.4.0".to_string(),
            dev_proxy: "http://ahead.local".to_string(),
            wordpress_theme_path: "../../../wordpress/wp-content/themes/ahead-labs".to_string(),
            src_theme: None,
        }
    }

    fn src_theme() -> ThemeSettings {
        ThemeSettings {
            name: "Ahead Labs Theme".to_string(),
            source: Some("ahead-labs".to_string()),
            source_type: Some("src".to_string()),
            description: Some("Corporate theme".to_string()),
            uri: Some("https://aheadlabs.com/theme".to_string()),
            author: Some("Ahead Labs, S.L.".to_string()),
            author_uri: Some("https://aheadlabs.com".to_string()),
            tags: vec!["blog".to_string(), "custom-menu".to_string()],
        }
    }

    #[test]
    fn test_default_file_lookup() {
        assert!(default_file(BROWSERSYNC_CONFIG).is_ok());
        assert!(default_file("missing.txt").is_err());
    }

    #[test]
    fn test_stylesheet_keeps_version_token() {
        let file = default_file(STYLESHEET_SOURCE).unwrap();
        let content = render_default_file(&TokenRenderer::new(), file, &options()).unwrap();
        assert!(content.contains("Theme Name: Ahead Labs\n"));
        assert!(content.contains("Text Domain: ahead-labs\n"));
        assert!(content.contains("Version: {{version}}\n"));
    }

    #[test]
    fn test_php_identifiers_use_theme_slug() {
        let renderer = TokenRenderer::new();
        let core = default_file("src/functions_php/functions-core.php").unwrap();
        let content = render_default_file(&renderer, core, &options()).unwrap();
        assert!(content.contains("function ahead_labs_register_assets()"));
        assert!(!content.contains("mytheme"));

        let toolset = default_file("src/functions_php/functions-toolset.php").unwrap();
        let content = render_default_file(&renderer, toolset, &options()).unwrap();
        assert!(content.contains("function ahead_labs_get_font_path("));
    }

    #[test]
    fn test_no_tokens_left_except_version() {
        let renderer = TokenRenderer::new();
        for file in DEFAULT_FILES.iter() {
            let content = render_default_file(&renderer, file, &options()).unwrap();
            let leftover = content.replace("{{version}}", "");
            assert!(!leftover.contains("{{"), "unrendered token in {}", file.path);
        }
    }

    #[test]
    fn test_stylesheet_header_from_src_theme() {
        let options = ScaffoldOptions { src_theme: Some(src_theme()), ..options() };
        let renderer = TokenRenderer::new();

        for path in [STYLESHEET_SOURCE, STYLESHEET_SCSS] {
            let file = default_file(path).unwrap();
            let content = render_default_file(&renderer, file, &options).unwrap();
            assert!(content.contains("Theme Name: Ahead Labs Theme\n"), "{}", path);
            assert!(content.contains("Theme URI: https://aheadlabs.com/theme\n"));
            assert!(content.contains("Author: Ahead Labs, S.L.\n"));
            assert!(content.contains("Author URI: https://aheadlabs.com\n"));
            assert!(content.contains("Description: Corporate theme\n"));
            assert!(content.contains("Tags: blog, custom-menu\n"));
            assert!(content.contains("Text Domain: ahead-labs\n"));
            assert!(content.contains("Version: {{version}}\n"));
        }
    }

    #[test]
    fn test_partial_src_theme_keeps_defaults() {
        let theme = ThemeSettings { name: "Plain".to_string(), ..src_theme() };
        let theme = ThemeSettings { author: None, tags: Vec::new(), ..theme };
        let options = ScaffoldOptions { src_theme: Some(theme), ..options() };

        let file = default_file(STYLESHEET_SOURCE).unwrap();
        let content = render_default_file(&TokenRenderer::new(), file, &options).unwrap();
        assert!(content.contains("Theme Name: Plain\n"));
        assert!(content.contains("Author: Ahead Labs\n"));
        assert!(content.contains("Tags: custom-theme\n"));
    }

    #[test]
    fn test_package_manifest_from_src_theme() {
        let options = ScaffoldOptions { src_theme: Some(src_theme()), ..options() };
        let file = default_file(PACKAGE_MANIFEST).unwrap();
        let content = render_default_file(&TokenRenderer::new(), file, &options).unwrap();

        let data: IndexMap<String, serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(data["name"], "ahead-labs");
        assert_eq!(data["version"], "1.4.0");
        assert_eq!(data["description"], "Corporate theme");
        assert_eq!(data["keywords"], serde_json::json!(["blog", "custom-menu"]));
        assert_eq!(
            data["author"],
            serde_json::json!({ "name": "Ahead Labs, S.L.", "url": "https://aheadlabs.com" })
        );
        // Key order of the template is kept
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(&keys[..5], &["name", "version", "description", "keywords", "author"]);
    }

    #[test]
    fn test_package_manifest_without_src_theme() {
        let file = default_file(PACKAGE_MANIFEST).unwrap();
        let content = render_default_file(&TokenRenderer::new(), file, &options()).unwrap();
        let data: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(data["description"], "Ahead Labs development theme");
        assert_eq!(data["keywords"], serde_json::json!([]));
    }

    #[test]
    fn test_webpack_keeps_stylesheet_header() {
        let webpack = default_file("webpack.config.js").unwrap();
        assert!(webpack.content.contains("./src/assets/scss/style.scss"));

        let scss = default_file(STYLESHEET_SCSS).unwrap();
        let content = render_default_file(&TokenRenderer::new(), scss, &options()).unwrap();
        assert!(content.starts_with("/*!"));
        assert!(content.contains("Version: {{version}}\n"));
        assert!(content.contains("$ahead_labs-accent"));
    }
}
