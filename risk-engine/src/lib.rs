//! Risk Engine for transaction records
//!
//! Additive risk scoring over the `transactionDetails` section of a record.
//! Every factor contributes independently, so new factors can be added
//! without changing the score of transactions they do not match.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod scoring;

pub use error::{Error, Result};
pub use types::*;
pub use scoring::RiskScorer;
