//! Configuration for the record store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base directory
pub const DEFAULT_BASE_DIR: &str = "/mnt/data";

/// Default destination file name
pub const DEFAULT_FILE_NAME: &str = "processedData.json";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory every stored and retrieved file lives in
    pub base_dir: PathBuf,

    /// File written by `store`, relative to `base_dir`
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `base_dir` with the default file name
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("/mnt/data"));
        assert_eq!(config.file_name, "processedData.json");
    }
}
