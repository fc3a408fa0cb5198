use config::{ConfigError, Environment};
use record_store::StoreConfig;
use risk_engine::ScoringRules;
use rust_decimal::Decimal;
use security::pseudonymizer::{DEFAULT_PSEUDONYM_LENGTH, MAX_PSEUDONYM_LENGTH};
use security::CipherMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::errors::{ServiceError, ServiceResult};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub anonymizer: AnonymizerConfig,
    pub encryption: EncryptionConfig,
    pub risk: RiskConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnonymizerConfig {
    pub pseudonym_length: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EncryptionConfig {
    pub mode: CipherMode,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    pub high_amount_threshold: Decimal,
    pub high_amount_weight: u32,
    pub home_currency: String,
    pub foreign_currency_weight: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            base_dir: store.base_dir,
            file_name: store.file_name,
        }
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            pseudonym_length: DEFAULT_PSEUDONYM_LENGTH,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            high_amount_threshold: rules.high_amount_threshold,
            high_amount_weight: rules.high_amount_weight,
            home_currency: rules.home_currency,
            foreign_currency_weight: rules.foreign_currency_weight,
        }
    }
}

impl StorageConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            base_dir: self.base_dir.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

impl RiskConfig {
    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            high_amount_threshold: self.high_amount_threshold,
            high_amount_weight: self.high_amount_weight,
            home_currency: self.home_currency.clone(),
            foreign_currency_weight: self.foreign_currency_weight,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            // Storage defaults
            .set_default("storage.base_dir", "/mnt/data")?
            .set_default("storage.file_name", "processedData.json")?
            // Anonymizer defaults
            .set_default("anonymizer.pseudonym_length", DEFAULT_PSEUDONYM_LENGTH as i64)?
            // Encryption defaults
            .set_default("encryption.mode", "aes-256-cbc-zero-iv")?
            // Risk rules
            .set_default("risk.high_amount_threshold", "1000")?
            .set_default("risk.high_amount_weight", 5)?
            .set_default("risk.home_currency", "USD")?
            .set_default("risk.foreign_currency_weight", 3)?;

        builder = builder.add_source(Environment::with_prefix("RECORD_SERVICE").separator("__"));

        // Override from environment variables
        if let Ok(dir) = env::var("STORAGE_DIR") {
            builder = builder.set_override("storage.base_dir", dir)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load from a TOML file; missing sections and keys take defaults
    pub fn from_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ServiceError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.storage.base_dir.as_os_str().is_empty() {
            return Err(ServiceError::Configuration(
                "storage.base_dir must not be empty".to_string(),
            ));
        }

        if self.storage.file_name.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "storage.file_name must not be empty".to_string(),
            ));
        }

        let length = self.anonymizer.pseudonym_length;
        if length == 0 || length > MAX_PSEUDONYM_LENGTH {
            return Err(ServiceError::Configuration(format!(
                "anonymizer.pseudonym_length must be 1-{}, got {}",
                MAX_PSEUDONYM_LENGTH, length
            )));
        }

        if self.risk.high_amount_threshold < Decimal::ZERO {
            return Err(ServiceError::Configuration(
                "risk.high_amount_threshold must be non-negative".to_string(),
            ));
        }

        let currency = &self.risk.home_currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ServiceError::Configuration(format!(
                "risk.home_currency must be a 3-letter code, got {:?}",
                currency
            )));
        }

        Ok(())
    }
}
