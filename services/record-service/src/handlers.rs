use crate::anonymizer::Anonymizer;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::models::*;
use crate::validation::{RecordValidator, ValidationOutcome};
use record_store::FlatFileStore;
use risk_engine::{RiskInput, RiskScorer};
use security::{PayloadCipher, Pseudonymizer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const VALIDATED_MESSAGE: &str = "Data validated successfully";
pub const STORED_MESSAGE: &str = "Data stored successfully";

/// Handler entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Validate,
    Anonymize,
    Encrypt,
    RiskAssessment,
    Store,
    Retrieve,
}

impl Handler {
    pub const ALL: [Handler; 6] = [
        Handler::Validate,
        Handler::Anonymize,
        Handler::Encrypt,
        Handler::RiskAssessment,
        Handler::Store,
        Handler::Retrieve,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Handler::Validate => "validate",
            Handler::Anonymize => "anonymize",
            Handler::Encrypt => "encrypt",
            Handler::RiskAssessment => "risk-assessment",
            Handler::Store => "store",
            Handler::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Handler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validate" => Ok(Handler::Validate),
            "anonymize" => Ok(Handler::Anonymize),
            "encrypt" => Ok(Handler::Encrypt),
            "risk-assessment" | "riskAssessment" => Ok(Handler::RiskAssessment),
            "store" => Ok(Handler::Store),
            "retrieve" => Ok(Handler::Retrieve),
            other => Err(format!(
                "unknown handler '{}', expected one of: {}",
                other,
                Handler::ALL.map(|h| h.name()).join(", ")
            )),
        }
    }
}

/// One method per handler; every method takes the raw request body and
/// never fails, mapping errors to a status code instead.
#[derive(Debug)]
pub struct RecordService {
    validator: RecordValidator,
    anonymizer: Anonymizer,
    cipher: PayloadCipher,
    scorer: RiskScorer,
    store: FlatFileStore,
}

impl RecordService {
    pub fn new(config: &Config) -> ServiceResult<Self> {
        config.validate()?;

        let pseudonymizer = Pseudonymizer::new(config.anonymizer.pseudonym_length)
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;

        Ok(Self {
            validator: RecordValidator::new()?,
            anonymizer: Anonymizer::new(pseudonymizer),
            cipher: PayloadCipher::new(config.encryption.mode),
            scorer: RiskScorer::new(config.risk.scoring_rules())?,
            store: FlatFileStore::open(&config.storage.store_config())?,
        })
    }

    pub fn dispatch(&self, handler: Handler, body: Option<&str>) -> HandlerResponse {
        match handler {
            Handler::Validate => self.validate(body),
            Handler::Anonymize => self.anonymize(body),
            Handler::Encrypt => self.encrypt(body),
            Handler::RiskAssessment => self.risk_assessment(body),
            Handler::Store => self.store(body),
            Handler::Retrieve => self.retrieve(body),
        }
    }

    // ===== Validate =====
    pub fn validate(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::Validate, || {
            let value = parse_body(body)?;

            match self.validator.validate(&value) {
                ValidationOutcome::Valid(record) => {
                    debug!(
                        transaction_id = %record.transaction_id,
                        currency = %record.transaction_details.currency,
                        "Record validated"
                    );
                    Ok(HandlerResponse::json(
                        200,
                        &MessageResponse {
                            message: VALIDATED_MESSAGE.to_string(),
                        },
                    ))
                }
                ValidationOutcome::Invalid(details) => Err(ServiceError::Validation(details)),
            }
        })
    }

    // ===== Anonymize =====
    pub fn anonymize(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::Anonymize, || {
            let value = parse_body(body)?;
            let anonymized = self.anonymizer.anonymize(value)?;
            Ok(HandlerResponse::json(200, &anonymized))
        })
    }

    // ===== Encrypt =====
    pub fn encrypt(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::Encrypt, || {
            let value = parse_body(body)?;
            let serialized = serde_json::to_vec(&value)
                .map_err(|e| ServiceError::MalformedBody(e.to_string()))?;

            let payload = self.cipher.encrypt(&serialized)?;
            Ok(HandlerResponse::json(200, &payload))
        })
    }

    // ===== Risk Assessment =====
    pub fn risk_assessment(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::RiskAssessment, || {
            let value = parse_body(body)?;
            let details = value
                .get("transactionDetails")
                .filter(|d| !d.is_null())
                .ok_or_else(|| ServiceError::MissingField("transactionDetails".to_string()))?;

            let input = RiskInput::from_value(details)?;
            let assessment = self.scorer.assess(&input);

            Ok(HandlerResponse::json(
                200,
                &RiskAssessmentResponse {
                    risk_score: assessment.risk_score.score(),
                },
            ))
        })
    }

    // ===== Store =====
    pub fn store(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::Store, || {
            let value = parse_body(body)?;
            let path = self.store.store(&value)?;

            Ok(HandlerResponse::json(
                200,
                &StoreResponse {
                    message: STORED_MESSAGE.to_string(),
                    file_path: path.display().to_string(),
                },
            ))
        })
    }

    // ===== Retrieve =====
    pub fn retrieve(&self, body: Option<&str>) -> HandlerResponse {
        self.respond(Handler::Retrieve, || {
            let value = parse_body(body)?;
            let file_path = match value.get("filePath") {
                None | Some(Value::Null) => {
                    return Err(ServiceError::MissingField("filePath".to_string()))
                }
                Some(Value::String(path)) => path,
                Some(_) => {
                    return Err(ServiceError::InvalidField {
                        path: "filePath".to_string(),
                        reason: "expected a string".to_string(),
                    })
                }
            };

            let contents = self.store.retrieve(file_path)?;
            Ok(HandlerResponse::ok(contents))
        })
    }

    fn respond<F>(&self, handler: Handler, run: F) -> HandlerResponse
    where
        F: FnOnce() -> ServiceResult<HandlerResponse>,
    {
        let started = Instant::now();
        let response = match run() {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    handler = %handler,
                    code = err.error_code(),
                    error = %err,
                    "Handler failed"
                );
                err.to_response()
            }
        };

        info!(
            handler = %handler,
            status = response.status_code,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Request handled"
        );
        response
    }
}

/// A missing or empty body is treated as `{}`
fn parse_body(body: Option<&str>) -> ServiceResult<Value> {
    let text = body.filter(|b| !b.trim().is_empty()).unwrap_or("{}");
    serde_json::from_str(text).map_err(|e| ServiceError::MalformedBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_names_round_trip() {
        for handler in Handler::ALL {
            assert_eq!(handler.name().parse::<Handler>().unwrap(), handler);
        }
        assert_eq!("riskAssessment".parse::<Handler>().unwrap(), Handler::RiskAssessment);
        assert!("delete".parse::<Handler>().is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(None).unwrap(), serde_json::json!({}));
        assert_eq!(parse_body(Some("")).unwrap(), serde_json::json!({}));
        assert!(matches!(
            parse_body(Some("{not json")),
            Err(ServiceError::MalformedBody(_))
        ));
    }
}
