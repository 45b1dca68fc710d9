//! wp-theme-kit scaffolds and builds WordPress development themes.
//! It resolves the target environment from the site configuration, writes
//! the default theme files with their placeholders substituted, and builds
//! theme sources into `dist` and the local WordPress install.

/// Theme distribution archives
pub mod archive;

/// Command-line interface module
pub mod cli;

/// Subcommand implementations
pub mod commands;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Logger setup
pub mod logger;

/// Theme `package.json` reading
pub mod manifest;

/// Theme stylesheet header parsing and rewriting
pub mod metadata;

/// Copy patterns for theme assets
pub mod patterns;

/// Build planning and execution
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder rendering
pub mod renderer;

/// Environment path resolution
pub mod resolver;

/// Default theme files
pub mod scaffold;

/// Site configuration (`site.json`)
/// Supports JSON and YAML content
pub mod site;

/// Rebuilds on source changes
pub mod watch;
