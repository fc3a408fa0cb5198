//! Transaction record schema validation
//!
//! Two passes:
//! 1. JSON Schema (draft 7, formats enforced) for structure and formats
//! 2. Typed mapping onto [`TransactionRecord`]
//!
//! Both report errors as `(path, message)` pairs and never panic on
//! malformed input. Unknown properties are allowed at every level.

use crate::errors::{ServiceError, ServiceResult};
use crate::models::{TransactionRecord, ValidationDetail};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

/// Schema for a complete transaction record
pub fn transaction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "transactionId": { "type": "string" },
            "userId": { "type": "string" },
            "transactionDetails": {
                "type": "object",
                "properties": {
                    "amount": { "type": "number", "minimum": 0 },
                    "currency": { "type": "string", "pattern": "^[A-Za-z]{3}$" },
                    "transactionDate": { "type": "string", "format": "date-time" },
                    "paymentMethod": { "type": "string" },
                    "merchantDetails": {
                        "type": "object",
                        "properties": {
                            "merchantId": { "type": "string" },
                            "name": { "type": "string" },
                            "category": { "type": "string" },
                            "countryCode": { "type": "string" }
                        },
                        "required": ["merchantId", "name", "category", "countryCode"]
                    }
                },
                "required": ["amount", "currency", "transactionDate", "paymentMethod", "merchantDetails"]
            },
            "userDetails": {
                "type": "object",
                "properties": {
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" },
                    "email": { "type": "string", "format": "email" },
                    "phone": { "type": "string" },
                    "billingAddress": {
                        "type": "object",
                        "properties": {
                            "street": { "type": "string" },
                            "city": { "type": "string" },
                            "state": { "type": "string" },
                            "postalCode": { "type": "string" },
                            "country": { "type": "string" }
                        },
                        "required": ["street", "city", "state", "postalCode", "country"]
                    }
                },
                "required": ["firstName", "lastName", "email", "phone", "billingAddress"]
            },
            "additionalInfo": {
                "type": "object",
                "properties": {
                    "deviceIp": { "type": "string", "format": "ipv4" },
                    "userAgent": { "type": "string" }
                },
                "required": ["deviceIp", "userAgent"]
            }
        },
        "required": ["transactionId", "userId", "transactionDetails", "userDetails", "additionalInfo"]
    })
}

/// Result of validating one value
#[derive(Debug)]
pub enum ValidationOutcome {
    Valid(Box<TransactionRecord>),
    Invalid(Vec<ValidationDetail>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// Validator holding the compiled schema
#[derive(Debug)]
pub struct RecordValidator {
    schema: JSONSchema,
}

impl RecordValidator {
    /// Compile the transaction schema
    pub fn new() -> ServiceResult<Self> {
        let schema = transaction_schema();
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .compile(&schema)
            .map_err(|e| {
                ServiceError::Configuration(format!("Invalid transaction schema: {}", e))
            })?;

        Ok(Self { schema: compiled })
    }

    pub fn validate(&self, value: &Value) -> ValidationOutcome {
        if let Err(errors) = self.schema.validate(value) {
            let details = errors
                .map(|error| ValidationDetail {
                    path: json_path(&error.instance_path.to_string()),
                    message: error.to_string(),
                })
                .collect();
            return ValidationOutcome::Invalid(details);
        }

        match serde_json::from_value::<TransactionRecord>(value.clone()) {
            Ok(record) => ValidationOutcome::Valid(Box::new(record)),
            Err(e) => ValidationOutcome::Invalid(vec![ValidationDetail {
                path: "$".to_string(),
                message: e.to_string(),
            }]),
        }
    }
}

/// Convert a JSON pointer (`/userDetails/email`) to `$.userDetails.email`
fn json_path(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold("$".to_string(), |mut path, segment| {
            if segment.chars().all(|c| c.is_ascii_digit()) {
                path.push_str(&format!("[{}]", segment));
            } else {
                path.push('.');
                path.push_str(segment);
            }
            path
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_record;

    fn details(outcome: ValidationOutcome) -> Vec<ValidationDetail> {
        match outcome {
            ValidationOutcome::Invalid(details) => details,
            ValidationOutcome::Valid(_) => panic!("expected validation failure"),
        }
    }

    #[test]
    fn test_valid_record() {
        let validator = RecordValidator::new().unwrap();
        match validator.validate(&valid_record()) {
            ValidationOutcome::Valid(record) => {
                assert_eq!(record.transaction_id, "TXN123456789");
                assert_eq!(record.user_details.billing_address.country, "USA");
                assert_eq!(record.additional_info.device_ip.to_string(), "192.168.1.1");
            }
            ValidationOutcome::Invalid(details) => panic!("unexpected errors: {:?}", details),
        }
    }

    #[test]
    fn test_only_transaction_id() {
        let validator = RecordValidator::new().unwrap();
        let errors = details(validator.validate(&json!({"transactionId": "TXN123456789"})));

        // userId, transactionDetails, userDetails, additionalInfo
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.path == "$"));
    }

    #[test]
    fn test_non_object_root() {
        let validator = RecordValidator::new().unwrap();
        assert!(!validator.validate(&json!([1, 2, 3])).is_valid());
        assert!(!validator.validate(&Value::Null).is_valid());
    }

    #[test]
    fn test_extra_fields_allowed() {
        let validator = RecordValidator::new().unwrap();
        let mut record = valid_record();
        record["loyaltyTier"] = json!("gold");
        record["userDetails"]["nickname"] = json!("JD");

        assert!(validator.validate(&record).is_valid());
    }

    #[test]
    fn test_format_checks() {
        let validator = RecordValidator::new().unwrap();

        let mut record = valid_record();
        record["userDetails"]["email"] = json!("not-an-email");
        let errors = details(validator.validate(&record));
        assert_eq!(errors[0].path, "$.userDetails.email");

        let mut record = valid_record();
        record["additionalInfo"]["deviceIp"] = json!("999.1.1.1");
        let errors = details(validator.validate(&record));
        assert_eq!(errors[0].path, "$.additionalInfo.deviceIp");

        let mut record = valid_record();
        record["transactionDetails"]["transactionDate"] = json!("yesterday");
        let errors = details(validator.validate(&record));
        assert_eq!(errors[0].path, "$.transactionDetails.transactionDate");
    }

    #[test]
    fn test_numeric_checks() {
        let validator = RecordValidator::new().unwrap();

        let mut record = valid_record();
        record["transactionDetails"]["amount"] = json!("250.00");
        assert!(!validator.validate(&record).is_valid());

        let mut record = valid_record();
        record["transactionDetails"]["amount"] = json!(-1);
        let errors = details(validator.validate(&record));
        assert_eq!(errors[0].path, "$.transactionDetails.amount");
    }

    #[test]
    fn test_amount_beyond_decimal_range() {
        let validator = RecordValidator::new().unwrap();
        let mut record = valid_record();
        record["transactionDetails"]["amount"] = json!(1e30);

        match validator.validate(&record) {
            ValidationOutcome::Valid(record) => {
                assert_eq!(record.transaction_details.amount, rust_decimal::Decimal::MAX);
            }
            ValidationOutcome::Invalid(details) => panic!("unexpected errors: {:?}", details),
        }
    }

    #[test]
    fn test_nested_required_fields() {
        let validator = RecordValidator::new().unwrap();
        let mut record = valid_record();
        record["userDetails"]["billingAddress"]
            .as_object_mut()
            .unwrap()
            .remove("postalCode");

        let errors = details(validator.validate(&record));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "$.userDetails.billingAddress");
        assert!(errors[0].message.contains("postalCode"));
    }

    #[test]
    fn test_json_path() {
        assert_eq!(json_path(""), "$");
        assert_eq!(json_path("/userDetails/email"), "$.userDetails.email");
        assert_eq!(json_path("/items/0/name"), "$.items[0].name");
    }
}
