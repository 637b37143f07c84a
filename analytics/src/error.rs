//! Analytics error types
//!
//! Only a missing or unreadable input directory aborts a run. Everything that
//! goes wrong inside a single file or a single classification is downgraded to
//! a diagnostic by the component that owns it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors surfaced by the analytics library
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The log directory does not exist or cannot be listed
    #[error("Input directory {path} is not accessible: {source}")]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Create an input-directory error
    pub fn input_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputDirectory {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
