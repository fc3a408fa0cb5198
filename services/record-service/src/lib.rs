//! Record service: stateless handlers over transaction records
//!
//! Each handler takes one JSON request body and returns a
//! [`HandlerResponse`](models::HandlerResponse) with a status code and a
//! JSON-encoded body:
//!
//! | Handler | Success body |
//! |---|---|
//! | `validate` | `{"message"}` |
//! | `anonymize` | record with pseudonymized personal fields |
//! | `encrypt` | `{"encryptedData","key"}` |
//! | `risk-assessment` | `{"riskScore"}` |
//! | `store` | `{"message","filePath"}` |
//! | `retrieve` | raw stored text |

pub mod anonymizer;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use errors::{ServiceError, ServiceResult};
pub use handlers::{Handler, RecordService};
pub use models::{HandlerResponse, TransactionRecord};
