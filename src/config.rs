//! Configuration for outgoing transmission dumps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Where and how outgoing transmissions are dumped.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use as2_partnership::DumpConfig;
///
/// let cfg = DumpConfig::from_json(r#"{"enabled": true, "directory": "/tmp/as2"}"#).unwrap();
/// assert!(cfg.enabled);
/// assert_eq!(cfg.file_extension, "http");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Dump outgoing transmissions at all.
    pub enabled: bool,
    /// Directory receiving one file per transmission.
    pub directory: PathBuf,
    /// File name prefix.
    pub file_prefix: String,
    /// File name extension, without the dot.
    pub file_extension: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("dumps"),
            file_prefix: "as2-outgoing-".to_string(),
            file_extension: "http".to_string(),
        }
    }
}

impl DumpConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] if the document does not
    /// parse or a value is invalid.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ValidationError::InvalidConfig {
            field: "json".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that generated file names stay inside `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let is_separator = |c: char| c == '/' || c == '\\';

        if self.file_prefix.is_empty() || self.file_prefix.contains(is_separator) {
            return Err(ValidationError::InvalidConfig {
                field: "file_prefix".to_string(),
                reason: "must be non-empty and contain no path separators".to_string(),
            });
        }
        if self.file_extension.is_empty()
            || self.file_extension.contains(is_separator)
            || self.file_extension.starts_with('.')
        {
            return Err(ValidationError::InvalidConfig {
                field: "file_extension".to_string(),
                reason: "must be non-empty, without a leading dot or path separators".to_string(),
            });
        }
        if self.enabled && self.directory.as_os_str().is_empty() {
            return Err(ValidationError::InvalidConfig {
                field: "directory".to_string(),
                reason: "required when dumping is enabled".to_string(),
            });
        }
        Ok(())
    }
}
