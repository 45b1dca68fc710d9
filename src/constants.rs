//! Common constants used throughout wp-theme-kit.

/// Environment used when none is requested
pub const DEFAULT_ENVIRONMENT: &str = "localhost";

/// Theme slug used when none is given
pub const DEFAULT_THEME_SLUG: &str = "aheadlabs";

/// WordPress install location relative to the theme project
pub const DEFAULT_WORDPRESS_PATH: &str = "../../../wordpress";

/// Site configuration location relative to the theme project
pub const DEFAULT_SITE_CONFIG: &str = "../../../site.json";

/// Build output directory, relative to the theme project
pub const DIST_DIR: &str = "dist";

/// Theme sources directory, relative to the theme project
pub const SRC_DIR: &str = "src";

/// Themes directory inside the WordPress content directory
pub const THEMES_DIR: &str = "themes";

pub const PACKAGE_MANIFEST: &str = "package.json";

pub const STYLESHEET_SOURCE: &str = "src/style.css";
pub const STYLESHEET_TARGET: &str = "style.css";

/// SCSS entry compiled into [`STYLESHEET_SOURCE`] by the theme's webpack
pub const STYLESHEET_SCSS: &str = "src/assets/scss/style.scss";

pub const SCRIPT_SOURCE: &str = "src/assets/js/main.js";
pub const SCRIPT_TARGET: &str = "assets/js/main.js";

pub const BROWSERSYNC_CONFIG: &str = "browsersync.config.js";

/// Project version used by the scaffold when the site configuration has none
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

/// Development proxy used by the scaffold when nothing else is configured
pub const DEFAULT_DEV_PROXY: &str = "http://localhost";

/// Directories never considered by the watcher
pub const WATCH_IGNORED_DIRS: [&str; 2] = [DIST_DIR, "node_modules"];
