//! Error types for the record store

use security::SanitizationError;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Store errors
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Requested path escapes the base directory
    #[error("Path traversal rejected: {0}")]
    PathTraversal(String),

    /// Requested path is malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SanitizationError> for Error {
    fn from(err: SanitizationError) -> Self {
        match err {
            SanitizationError::PathTraversal(path) => Error::PathTraversal(path),
            other => Error::InvalidPath(other.to_string()),
        }
    }
}
