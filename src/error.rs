//! Structured error types for source loading.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a [`FormatAdapter`](crate::adapters::FormatAdapter) when
/// content cannot be turned into a mapping.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Unreadable,
    UnsupportedFormat,
    ParseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unreadable => "UNREADABLE",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorCode::ParseError => "PARSE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single `append` call.
///
/// The store is left exactly as it was before the call, and the source is not
/// recorded as loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("config source is not readable: {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to parse {format} config {}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: AdapterError,
    },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::NotFound { .. } => ErrorCode::NotFound,
            ConfigError::Unreadable { .. } => ErrorCode::Unreadable,
            ConfigError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            ConfigError::Parse { .. } => ErrorCode::ParseError,
        }
    }

    /// The source path the failing call was given (after `~` expansion).
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::NotFound { path }
            | ConfigError::Unreadable { path, .. }
            | ConfigError::UnsupportedFormat { path, .. }
            | ConfigError::Parse { path, .. } => path.as_path(),
        }
    }
}

/// Result type for store operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
