//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A limit that must be positive was set to zero.
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file.
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
