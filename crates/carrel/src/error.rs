//! Error types for loading and saving viewer settings.
//!
//! Viewer operations themselves never fail; malformed input degrades to
//! placeholders. Only reading and writing configuration files can error.

use std::path::PathBuf;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// File I/O error.
    #[error("Failed to access settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("Failed to parse settings from {origin}: {message}")]
    Parse { origin: String, message: String },

    /// TOML serialization error.
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// A value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ViewerError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
