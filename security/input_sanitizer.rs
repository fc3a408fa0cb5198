//! Input Sanitization and Validation
//!
//! Validation of caller-supplied file names before they touch the
//! filesystem:
//! - Path traversal prevention (`..`, absolute paths outside the base)
//! - Control character rejection
//! - Segment whitelist (no hidden files, no shell metacharacters)

use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Maximum accepted path length in bytes
pub const MAX_PATH_LENGTH: usize = 1024;

/// Sanitization errors
#[derive(Error, Debug)]
pub enum SanitizationError {
    /// Input failed a general check
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Input exceeds the length limit
    #[error("Input too long: max {max}, got {actual}")]
    TooLong {
        /// Maximum length
        max: usize,
        /// Actual length
        actual: usize,
    },

    /// Input has a disallowed shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input contains a control character
    #[error("Forbidden character: {0:?}")]
    ForbiddenCharacter(char),

    /// Input would escape the base directory
    #[error("Path traversal attempt detected: {0}")]
    PathTraversal(String),
}

/// Result type for sanitization
pub type Result<T> = std::result::Result<T, SanitizationError>;

/// Input sanitizer
#[derive(Debug)]
pub struct InputSanitizer {
    /// Regex every path segment must match
    segment_regex: Regex,

    /// Forbidden characters
    forbidden_chars: HashSet<char>,
}

impl InputSanitizer {
    /// Create new input sanitizer
    pub fn new() -> Self {
        let segment_regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,254}$")
            .expect("segment pattern is a valid regex");

        let forbidden_chars = ('\0'..='\x1f').chain(std::iter::once('\x7f')).collect();

        Self {
            segment_regex,
            forbidden_chars,
        }
    }

    /// Validate a relative path and return it with `.` segments removed.
    ///
    /// Rejects empty input, `..` segments, absolute paths, control
    /// characters and segments outside the whitelist.
    pub fn sanitize_relative_path(&self, input: &str) -> Result<PathBuf> {
        if input.trim().is_empty() {
            return Err(SanitizationError::Invalid("path is empty".to_string()));
        }

        if input.len() > MAX_PATH_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_PATH_LENGTH,
                actual: input.len(),
            });
        }

        if let Some(ch) = input.chars().find(|c| self.forbidden_chars.contains(c)) {
            return Err(SanitizationError::ForbiddenCharacter(ch));
        }

        let mut clean = PathBuf::new();
        for component in Path::new(input).components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        SanitizationError::InvalidFormat("path is not valid UTF-8".to_string())
                    })?;

                    if !self.segment_regex.is_match(segment) {
                        return Err(SanitizationError::InvalidFormat(format!(
                            "invalid path segment: {}",
                            segment
                        )));
                    }

                    clean.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(SanitizationError::PathTraversal(input.to_string()));
                }
            }
        }

        if clean.as_os_str().is_empty() {
            return Err(SanitizationError::Invalid(
                "path has no file component".to_string(),
            ));
        }

        Ok(clean)
    }

    /// Resolve `input` under `base`.
    ///
    /// Absolute inputs are accepted only when they lie inside `base`; the
    /// remainder is then checked like any relative path.
    pub fn resolve_within(&self, base: &Path, input: &str) -> Result<PathBuf> {
        let requested = Path::new(input);

        let relative = if requested.has_root() {
            let rest = requested
                .strip_prefix(base)
                .map_err(|_| SanitizationError::PathTraversal(input.to_string()))?;
            rest.to_str()
                .ok_or_else(|| {
                    SanitizationError::InvalidFormat("path is not valid UTF-8".to_string())
                })?
                .to_string()
        } else {
            input.to_string()
        };

        let clean = self.sanitize_relative_path(&relative)?;
        Ok(base.join(clean))
    }
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_relative_path() {
        let sanitizer = InputSanitizer::new();

        assert_eq!(
            sanitizer.sanitize_relative_path("processedData.json").unwrap(),
            PathBuf::from("processedData.json")
        );
        assert_eq!(
            sanitizer.sanitize_relative_path("./reports/2024-04.json").unwrap(),
            PathBuf::from("reports/2024-04.json")
        );
    }

    #[test]
    fn test_path_traversal() {
        let sanitizer = InputSanitizer::new();

        assert!(matches!(
            sanitizer.sanitize_relative_path("../etc/passwd"),
            Err(SanitizationError::PathTraversal(_))
        ));
        assert!(matches!(
            sanitizer.sanitize_relative_path("reports/../../secret.json"),
            Err(SanitizationError::PathTraversal(_))
        ));
        assert!(matches!(
            sanitizer.sanitize_relative_path("/etc/passwd"),
            Err(SanitizationError::PathTraversal(_))
        ));
    }

    #[test]
    fn test_rejects_odd_segments() {
        let sanitizer = InputSanitizer::new();

        assert!(sanitizer.sanitize_relative_path("").is_err());
        assert!(sanitizer.sanitize_relative_path(".").is_err());
        assert!(sanitizer.sanitize_relative_path(".hidden").is_err());
        assert!(sanitizer.sanitize_relative_path("..\\secret.json").is_err());
        assert!(sanitizer.sanitize_relative_path("file.json; rm -rf /").is_err());
        assert!(matches!(
            sanitizer.sanitize_relative_path("file\0.json"),
            Err(SanitizationError::ForbiddenCharacter('\0'))
        ));
    }

    #[test]
    fn test_too_long() {
        let sanitizer = InputSanitizer::new();
        let long = "a/".repeat(MAX_PATH_LENGTH);

        assert!(matches!(
            sanitizer.sanitize_relative_path(&long),
            Err(SanitizationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_resolve_within() {
        let sanitizer = InputSanitizer::new();
        let base = Path::new("/mnt/data");

        assert_eq!(
            sanitizer.resolve_within(base, "processedData.json").unwrap(),
            PathBuf::from("/mnt/data/processedData.json")
        );
        assert_eq!(
            sanitizer
                .resolve_within(base, "/mnt/data/processedData.json")
                .unwrap(),
            PathBuf::from("/mnt/data/processedData.json")
        );

        assert!(matches!(
            sanitizer.resolve_within(base, "/etc/passwd"),
            Err(SanitizationError::PathTraversal(_))
        ));
        assert!(matches!(
            sanitizer.resolve_within(base, "/mnt/data/../etc/passwd"),
            Err(SanitizationError::PathTraversal(_))
        ));
        assert!(matches!(
            sanitizer.resolve_within(base, "/mnt/database.json"),
            Err(SanitizationError::PathTraversal(_))
        ));
    }
}
