//! Core types for risk engine

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Risk score (non-negative sum of factor weights)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u32);

impl RiskScore {
    /// Zero score
    pub const ZERO: RiskScore = RiskScore(0);

    /// Create new risk score
    pub fn new(score: u32) -> Self {
        Self(score)
    }

    /// Get raw score
    pub fn score(&self) -> u32 {
        self.0
    }

    /// Add a factor weight, saturating at `u32::MAX`
    pub fn with_weight(self, weight: u32) -> Self {
        Self(self.0.saturating_add(weight))
    }
}

/// Kind of risk factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    /// Amount above the high value threshold
    HighAmount,
    /// Currency other than the home currency
    ForeignCurrency,
}

/// A factor that contributed to a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Factor kind
    pub kind: RiskFactorKind,

    /// Points added to the score
    pub weight: u32,

    /// Human readable reason
    pub reason: String,
}

/// Risk assessment result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk score
    pub risk_score: RiskScore,

    /// Factors that fired, in evaluation order
    pub factors: Vec<RiskFactor>,
}

/// The attributes a score is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskInput {
    /// Transaction amount
    pub amount: Decimal,

    /// Currency code, compared verbatim against the home currency
    pub currency: String,
}

impl RiskInput {
    /// Create input directly
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Extract `amount` and `currency` from a `transactionDetails` object.
    ///
    /// Other fields are ignored.
    pub fn from_value(details: &Value) -> Result<Self> {
        let amount = match details.get("amount") {
            None | Some(Value::Null) => return Err(Error::MissingFactor("amount".to_string())),
            Some(Value::Number(n)) => decimal_from_number(n)?,
            Some(_) => {
                return Err(Error::InvalidFactor {
                    field: "amount".to_string(),
                    reason: "expected a number".to_string(),
                })
            }
        };

        let currency = match details.get("currency") {
            None | Some(Value::Null) => {
                return Err(Error::MissingFactor("currency".to_string()))
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(Error::InvalidFactor {
                    field: "currency".to_string(),
                    reason: "expected a string".to_string(),
                })
            }
        };

        Ok(Self { amount, currency })
    }
}

fn decimal_from_number(n: &Number) -> Result<Decimal> {
    if let Some(i) = n.as_i64() {
        return Ok(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Decimal::from(u));
    }

    let f = n.as_f64().ok_or_else(|| Error::InvalidFactor {
        field: "amount".to_string(),
        reason: "not representable".to_string(),
    })?;

    saturating_decimal(f).ok_or_else(|| Error::InvalidFactor {
        field: "amount".to_string(),
        reason: format!("{} is not a finite number", f),
    })
}

/// Convert a float to `Decimal`.
///
/// Finite values beyond the `Decimal` range clamp to `Decimal::MAX` or
/// `Decimal::MIN`; values too small to represent become zero. Returns
/// `None` for NaN and infinities.
pub fn saturating_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }

    match Decimal::try_from(value) {
        Ok(decimal) => Some(decimal),
        Err(_) if value.abs() < 1.0 => Some(Decimal::ZERO),
        Err(_) if value.is_sign_negative() => Some(Decimal::MIN),
        Err(_) => Some(Decimal::MAX),
    }
}

/// Thresholds and weights used by the scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Amounts strictly above this are high value
    pub high_amount_threshold: Decimal,

    /// Points for a high value amount
    pub high_amount_weight: u32,

    /// Currency that carries no foreign currency risk
    pub home_currency: String,

    /// Points for any other currency
    pub foreign_currency_weight: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            high_amount_threshold: Decimal::from(1000),
            high_amount_weight: 5,
            home_currency: "USD".to_string(),
            foreign_currency_weight: 3,
        }
    }
}
