//! Flat-file storage
//!
//! `store` serializes a JSON value to compact text and moves it into place
//! with a rename, so a concurrent `retrieve` never observes a torn file.
//! Temporary files are dot-prefixed and therefore unreachable through
//! `retrieve`.

use crate::{
    error::{Error, Result},
    StoreConfig,
};
use security::InputSanitizer;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Flat-file store rooted at a fixed base directory
#[derive(Debug)]
pub struct FlatFileStore {
    base_dir: PathBuf,
    destination: PathBuf,
    sanitizer: InputSanitizer,
}

impl FlatFileStore {
    /// Create a store from configuration.
    ///
    /// The base directory is created lazily on the first write.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.base_dir.as_os_str().is_empty() {
            return Err(Error::Config("storage base directory is empty".to_string()));
        }

        let sanitizer = InputSanitizer::new();
        let relative = sanitizer
            .sanitize_relative_path(&config.file_name)
            .map_err(|e| Error::Config(format!("invalid storage file name: {}", e)))?;

        Ok(Self {
            destination: config.base_dir.join(relative),
            base_dir: config.base_dir.clone(),
            sanitizer,
        })
    }

    /// Base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path `store` writes to
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Overwrite the destination file with `value` and return its path
    pub fn store(&self, value: &Value) -> Result<PathBuf> {
        let serialized = serde_json::to_vec(value)?;
        self.write_atomic(&self.destination, &serialized)?;

        info!(
            path = %self.destination.display(),
            bytes = serialized.len(),
            "Data stored"
        );
        Ok(self.destination.clone())
    }

    /// Read a file under the base directory as text
    pub fn retrieve(&self, requested: &str) -> Result<String> {
        let path = self.resolve(requested)?;

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "Data retrieved");
                Ok(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(requested.to_string()))
            }
            // Directories are not stored records
            Err(_) if path.is_dir() => Err(Error::NotFound(requested.to_string())),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Resolve a caller-supplied name to a path inside the base directory
    pub fn resolve(&self, requested: &str) -> Result<PathBuf> {
        self.sanitizer
            .resolve_within(&self.base_dir, requested)
            .map_err(|e| {
                warn!(requested = %requested.escape_debug(), error = %e, "Rejected storage path");
                Error::from(e)
            })
    }

    /// Write to a temporary sibling, flush, then persist over `dest`.
    ///
    /// The temporary file is removed on drop if anything before the
    /// rename fails.
    fn write_atomic(&self, dest: &Path, bytes: &[u8]) -> Result<()> {
        let parent = dest.parent().unwrap_or(&self.base_dir);
        fs::create_dir_all(parent)?;

        let file_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("blob");
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(parent)?;

        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FlatFileStore {
        FlatFileStore::open(&StoreConfig::with_base_dir(dir.path())).unwrap()
    }

    #[test]
    fn test_store_and_retrieve() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let value = json!({"transactionId": "TXN123456789", "amount": 250});

        let path = store.store(&value).unwrap();
        assert_eq!(path, temp_dir.path().join("processedData.json"));

        let contents = store.retrieve("processedData.json").unwrap();
        assert_eq!(contents, serde_json::to_string(&value).unwrap());
    }

    #[test]
    fn test_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.store(&json!({"version": 1})).unwrap();
        store.store(&json!({"version": 2})).unwrap();

        assert_eq!(store.retrieve("processedData.json").unwrap(), r#"{"version":2}"#);
    }

    #[test]
    fn test_no_temporary_files_left() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.store(&json!([1, 2, 3])).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["processedData.json"]);
    }

    #[test]
    fn test_creates_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");
        let store = FlatFileStore::open(&StoreConfig::with_base_dir(&base)).unwrap();

        store.store(&json!({"ok": true})).unwrap();
        assert!(base.join("processedData.json").exists());
    }

    #[test]
    fn test_retrieve_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(matches!(
            store.retrieve("missing.json"),
            Err(Error::NotFound(ref name)) if name == "missing.json"
        ));
    }

    #[test]
    fn test_retrieve_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(matches!(
            store.retrieve("../processedData.json"),
            Err(Error::PathTraversal(_))
        ));
        assert!(matches!(
            store.retrieve("/etc/passwd"),
            Err(Error::PathTraversal(_))
        ));
        assert!(matches!(store.retrieve(""), Err(Error::InvalidPath(_))));
        assert!(matches!(
            store.retrieve("processed\0Data.json"),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_retrieve_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir(temp_dir.path().join("reports")).unwrap();

        assert!(matches!(
            store.retrieve("reports"),
            Err(Error::NotFound(ref name)) if name == "reports"
        ));
    }

    #[test]
    fn test_failed_write_leaves_no_temporary_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        // A directory at the destination makes the final rename fail
        fs::create_dir(temp_dir.path().join("processedData.json")).unwrap();
        assert!(matches!(store.store(&json!({"ok": true})), Err(Error::Io(_))));

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["processedData.json"]);
    }

    #[test]
    fn test_invalid_file_name_config() {
        let config = StoreConfig {
            base_dir: PathBuf::from("/tmp"),
            file_name: "../escape.json".to_string(),
        };
        assert!(matches!(FlatFileStore::open(&config), Err(Error::Config(_))));
    }
}
