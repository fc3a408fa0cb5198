//! Flat-file record store
//!
//! Persists one JSON blob per destination file under a fixed base
//! directory and reads files back by name.
//!
//! # Invariants
//!
//! - Writes are atomic: readers see the old or the new blob, never a mix
//! - Last writer wins; there is no locking or versioning
//! - Every read path resolves inside the base directory

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod storage;

// Re-exports
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use storage::FlatFileStore;
