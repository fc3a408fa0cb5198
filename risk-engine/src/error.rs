//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// A factor the scorer requires is absent
    #[error("Missing risk factor: {0}")]
    MissingFactor(String),

    /// A factor is present but has the wrong shape
    #[error("Invalid risk factor {field}: {reason}")]
    InvalidFactor {
        /// Field name inside `transactionDetails`
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
