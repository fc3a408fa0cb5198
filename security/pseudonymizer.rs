//! Deterministic pseudonyms for personal data fields
//!
//! A pseudonym is the lowercase hex SHA-256 digest of the input bytes,
//! truncated to a fixed length. The same input always yields the same
//! pseudonym, which keeps joins possible but also means equal values stay
//! linkable. Ten hex characters carry 40 bits; expect collisions once a
//! population reaches roughly a million distinct values.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Default pseudonym length in hex characters
pub const DEFAULT_PSEUDONYM_LENGTH: usize = 10;

/// Full SHA-256 digest length in hex characters
pub const MAX_PSEUDONYM_LENGTH: usize = 64;

/// Pseudonymizer errors
#[derive(Error, Debug)]
pub enum PseudonymError {
    /// Requested length outside `1..=64`
    #[error("Invalid pseudonym length: {0} (must be 1-64)")]
    InvalidLength(usize),
}

/// Pseudonym generator with a fixed output length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pseudonymizer {
    length: usize,
}

impl Pseudonymizer {
    /// Create a pseudonymizer producing `length` hex characters
    pub fn new(length: usize) -> Result<Self, PseudonymError> {
        if length == 0 || length > MAX_PSEUDONYM_LENGTH {
            return Err(PseudonymError::InvalidLength(length));
        }

        Ok(Self { length })
    }

    /// Output length in hex characters
    pub fn length(&self) -> usize {
        self.length
    }

    /// Derive the pseudonym for `input`
    pub fn pseudonym(&self, input: &str) -> String {
        let digest = Sha256::digest(input.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(self.length);
        encoded
    }
}

impl Default for Pseudonymizer {
    fn default() -> Self {
        Self {
            length: DEFAULT_PSEUDONYM_LENGTH,
        }
    }
}

/// Pseudonym with the default length
pub fn pseudonym(input: &str) -> String {
    Pseudonymizer::default().pseudonym(input)
}
