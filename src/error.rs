//! Error handling for wp-theme-kit.
//! Defines the error type and result alias used throughout the application.

use std::io;
use thiserror::Error as ThisError;

/// Custom error types for theme operations.
///
/// This enum represents all possible errors that can occur while resolving,
/// scaffolding or building a theme. It implements the standard Error trait
/// through thiserror's derive macro.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors in JSON documents (site configuration, package manifest)
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors that occur during placeholder rendering
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The requested environment is not declared in the site configuration
    #[error("Environment '{environment}' not found in site configuration (available: {available}).")]
    EnvironmentNotFound { environment: String, available: String },

    /// Represents a package manifest that cannot provide a required value
    #[error("Package manifest error: {0}.")]
    ManifestError(String),

    /// A required copy source matched no files
    #[error("No files matched required pattern '{pattern}'.")]
    MissingAssetError { pattern: String },

    /// Represents invalid copy patterns
    #[error("Pattern error: {0}.")]
    PatternError(String),

    /// Represents failures of interactive prompts
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// Represents failures while writing the theme archive
    #[error("Archive error: {0}.")]
    ArchiveError(String),

    /// Represents failures of the filesystem watcher
    #[error("Watch error: {0}.")]
    WatchError(#[from] notify::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::IoError(err.into())
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Error::PatternError(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveError(err.to_string())
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
