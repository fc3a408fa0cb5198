use crate::models::{ErrorResponse, HandlerResponse, ValidationDetail, ValidationFailureResponse};
use security::CipherError;
use thiserror::Error;

pub const INVALID_DATA_FORMAT: &str = "Invalid data format";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationDetail>),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field {path}: {reason}")]
    InvalidField { path: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Encryption error: {0}")]
    Encryption(#[from] CipherError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MalformedBody(_)
            | ServiceError::Validation(_)
            | ServiceError::MissingField(_)
            | ServiceError::InvalidField { .. }
            | ServiceError::PathTraversal(_)
            | ServiceError::InvalidPath(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Io(_) | ServiceError::Encryption(_) | ServiceError::Configuration(_) => {
                500
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MalformedBody(_) => "MALFORMED_BODY",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::MissingField(_) => "MISSING_FIELD",
            ServiceError::InvalidField { .. } => "INVALID_FIELD",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::PathTraversal(_) => "PATH_TRAVERSAL",
            ServiceError::InvalidPath(_) => "INVALID_PATH",
            ServiceError::Io(_) => "IO_ERROR",
            ServiceError::Encryption(_) => "ENCRYPTION_ERROR",
            ServiceError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    pub fn to_response(&self) -> HandlerResponse {
        match self {
            ServiceError::Validation(details) => HandlerResponse::json(
                self.status_code(),
                &ValidationFailureResponse {
                    error: INVALID_DATA_FORMAT.to_string(),
                    details: details.clone(),
                },
            ),
            // Server-side failures do not echo filesystem or cipher internals
            ServiceError::Io(_) => HandlerResponse::json(
                self.status_code(),
                &ErrorResponse {
                    error: self.error_code().to_string(),
                    message: "Internal storage error".to_string(),
                },
            ),
            ServiceError::Configuration(_) => HandlerResponse::json(
                self.status_code(),
                &ErrorResponse {
                    error: self.error_code().to_string(),
                    message: "Service misconfigured".to_string(),
                },
            ),
            ServiceError::Encryption(_) => HandlerResponse::json(
                self.status_code(),
                &ErrorResponse {
                    error: self.error_code().to_string(),
                    message: "Encryption failed".to_string(),
                },
            ),
            _ => HandlerResponse::json(
                self.status_code(),
                &ErrorResponse {
                    error: self.error_code().to_string(),
                    message: self.to_string(),
                },
            ),
        }
    }
}

impl From<record_store::Error> for ServiceError {
    fn from(err: record_store::Error) -> Self {
        match err {
            record_store::Error::NotFound(name) => ServiceError::NotFound(name),
            record_store::Error::PathTraversal(path) => ServiceError::PathTraversal(path),
            record_store::Error::InvalidPath(reason) => ServiceError::InvalidPath(reason),
            record_store::Error::Config(reason) => ServiceError::Configuration(reason),
            other @ (record_store::Error::Io(_) | record_store::Error::Serialization(_)) => {
                ServiceError::Io(other.to_string())
            }
        }
    }
}

impl From<risk_engine::Error> for ServiceError {
    fn from(err: risk_engine::Error) -> Self {
        match err {
            risk_engine::Error::MissingFactor(field) => {
                ServiceError::MissingField(format!("transactionDetails.{}", field))
            }
            risk_engine::Error::InvalidFactor { field, reason } => ServiceError::InvalidField {
                path: format!("transactionDetails.{}", field),
                reason,
            },
            risk_engine::Error::InvalidConfig(reason) => ServiceError::Configuration(reason),
        }
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
