//! Error handling types for toppingmaker
//!
//! This module provides the error type shared by target resolution,
//! configuration loading and topping generation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Comprehensive error type for topping operations
#[derive(Debug, Error)]
pub enum ToppingError {
    /// Filesystem operation failed on a specific path
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// The asset writer refused or failed to produce an asset
    #[error("Export failed: {message}")]
    Export { message: String },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for topping operations
pub type ToppingResult<T> = Result<T, ToppingError>;

/// Helper functions for common error patterns
impl ToppingError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ToppingError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ToppingError::Config {
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        ToppingError::Export {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ToppingError::Internal(message.into())
    }
}
