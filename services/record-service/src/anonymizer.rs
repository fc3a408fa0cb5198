//! Field-level pseudonymization of transaction records
//!
//! Replaces the personal fields of `userDetails` with pseudonyms, in a
//! fixed order. `billingAddress.country` and every field not listed here
//! pass through unchanged, including unknown extra fields.

use crate::errors::{ServiceError, ServiceResult};
use security::Pseudonymizer;
use serde_json::Value;
use tracing::debug;

/// JSON pointers of the fields replaced by pseudonyms, in replacement order
pub const PSEUDONYMIZED_FIELDS: [&str; 8] = [
    "/userDetails/firstName",
    "/userDetails/lastName",
    "/userDetails/email",
    "/userDetails/phone",
    "/userDetails/billingAddress/street",
    "/userDetails/billingAddress/city",
    "/userDetails/billingAddress/state",
    "/userDetails/billingAddress/postalCode",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymizer {
    pseudonymizer: Pseudonymizer,
}

impl Anonymizer {
    pub fn new(pseudonymizer: Pseudonymizer) -> Self {
        Self { pseudonymizer }
    }

    /// Return `record` with every listed field replaced by its pseudonym.
    ///
    /// Fails with `MissingField` on the first absent field and
    /// `InvalidField` on the first non-string field; the record is consumed
    /// either way, so no partially anonymized value escapes.
    pub fn anonymize(&self, mut record: Value) -> ServiceResult<Value> {
        for pointer in PSEUDONYMIZED_FIELDS {
            let slot = record
                .pointer_mut(pointer)
                .ok_or_else(|| ServiceError::MissingField(dotted(pointer)))?;

            let original = slot.as_str().ok_or_else(|| ServiceError::InvalidField {
                path: dotted(pointer),
                reason: "expected a string".to_string(),
            })?;

            let replacement = Value::String(self.pseudonymizer.pseudonym(original));
            *slot = replacement;
        }

        debug!(fields = PSEUDONYMIZED_FIELDS.len(), "Record anonymized");
        Ok(record)
    }
}

fn dotted(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
