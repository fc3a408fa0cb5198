//! Security primitives for transaction record handling
//!
//! Provides the data-protection building blocks used by the record service:
//! - Pseudonymization of personal fields
//! - Payload encryption under per-call keys
//! - Input sanitization for caller-supplied file paths
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Security Layer                      │
//! ├─────────────────────────────────────────────────────┤
//! │  Pseudonymizer  │  Payload Cipher  │ Input Sanitizer │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │              Record Service Handlers                 │
//! │  anonymize │ encrypt │ store │ retrieve              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! ## Pseudonymization (`pseudonymizer`)
//! - SHA-256 digest, lowercase hex, truncated (10 characters by default)
//! - Pure and deterministic: equal inputs give equal pseudonyms
//! - Determinism leaks equality, and a 40-bit digest has a real collision
//!   rate over large populations
//!
//! ## Payload Encryption (`payload_cipher`)
//! - AES-256-CBC with PKCS#7 padding and an all-zero IV (default)
//! - AES-256-GCM with a random nonce (opt-in)
//! - A fresh 256-bit key per call, returned next to the ciphertext
//!
//! ## Input Sanitization (`input_sanitizer`)
//! - Rejects `..` segments, absolute paths outside the base directory,
//!   control characters and hidden files
//! - Resolves accepted names under a fixed base directory
//!
//! # Usage Examples
//!
//! ## Pseudonyms
//!
//! ```rust
//! use security::pseudonymizer::pseudonym;
//!
//! assert_eq!(pseudonym("John"), pseudonym("John"));
//! assert_eq!(pseudonym("John").len(), 10);
//! ```
//!
//! ## Encryption
//!
//! ```rust
//! use security::payload_cipher::{CipherMode, PayloadCipher};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cipher = PayloadCipher::new(CipherMode::Aes256CbcZeroIv);
//! let payload = cipher.encrypt(br#"{"amount":250}"#)?;
//! let plaintext = cipher.decrypt(&payload)?;
//! assert_eq!(plaintext, br#"{"amount":250}"#);
//! # Ok(())
//! # }
//! ```
//!
//! ## Path Sanitization
//!
//! ```rust
//! use security::input_sanitizer::InputSanitizer;
//! use std::path::Path;
//!
//! let sanitizer = InputSanitizer::new();
//! assert!(sanitizer.resolve_within(Path::new("/mnt/data"), "report.json").is_ok());
//! assert!(sanitizer.resolve_within(Path::new("/mnt/data"), "../etc/passwd").is_err());
//! ```
//!
//! # Known Weaknesses
//!
//! The default cipher mode reproduces a legacy contract and is NOT a
//! confidentiality mechanism across untrusted channels:
//!
//! 1. **Fixed IV** - every CBC encryption uses sixteen zero bytes as IV.
//!    Identical plaintexts under one key give identical ciphertexts. Only
//!    the per-call key keeps this from leaking across calls.
//! 2. **Key disclosure** - the key is returned next to the ciphertext.
//! 3. **No integrity** - CBC carries no MAC. Use `CipherMode::Aes256Gcm`
//!    when tampering matters.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod input_sanitizer;
pub mod payload_cipher;
pub mod pseudonymizer;

// Re-exports for convenience
pub use input_sanitizer::{InputSanitizer, SanitizationError};
pub use payload_cipher::{CipherError, CipherMode, EncryptedPayload, PayloadCipher};
pub use pseudonymizer::{pseudonym, Pseudonymizer, PseudonymError};
