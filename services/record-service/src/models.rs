use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

// ===== Transaction Record =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub user_id: String,
    pub transaction_details: TransactionDetails,
    pub user_details: UserDetails,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(with = "amount")]
    pub amount: Decimal,
    pub currency: String,
    pub transaction_date: DateTime<Utc>,
    pub payment_method: String,
    pub merchant_details: MerchantDetails,
}

/// JSON number amounts; values beyond the `Decimal` range clamp instead of
/// failing, matching how the risk scorer reads them
mod amount {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        risk_engine::saturating_decimal(value)
            .ok_or_else(|| de::Error::custom(format!("amount {} is not a finite number", value)))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDetails {
    pub merchant_id: String,
    pub name: String,
    pub category: String,
    pub country_code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub billing_address: BillingAddress,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub device_ip: Ipv4Addr,
    pub user_agent: String,
}

// ===== Handler Envelope =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    /// JSON-encoded text (raw file text for `retrieve`)
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// Serialize `body` as the response body. Falls back to a 500 when the
    /// body cannot be encoded.
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self { status_code, body },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                Self {
                    status_code: 500,
                    body: r#"{"error":"INTERNAL_ERROR","message":"Failed to serialize response"}"#
                        .to_string(),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

// ===== Response Bodies =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    /// JSON path of the offending value, `$` for the root
    pub path: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationFailureResponse {
    pub error: String,
    pub details: Vec<ValidationDetail>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentResponse {
    pub risk_score: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub message: String,
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
