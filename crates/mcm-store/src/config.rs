//! Store settings.

use std::fs;
use std::path::Path;

use mcm_ingest::MAX_CSV_FILE_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Settings that control how collection files are read and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Largest file, in bytes, that will be loaded.
    pub max_file_size: u64,

    /// Write saves to a temporary file and rename it over the target.
    pub atomic_save: bool,

    /// Emit a warning with the row numbers of dropped rows after a load.
    pub log_dropped_rows: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            max_file_size: MAX_CSV_FILE_SIZE,
            atomic_save: true,
            log_dropped_rows: true,
        }
    }
}

impl StoreSettings {
    /// Parses settings from JSON. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text).map_err(|e| StoreError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = StoreSettings::default();
        assert_eq!(settings.max_file_size, 500 * 1024 * 1024);
        assert!(settings.atomic_save);
        assert!(settings.log_dropped_rows);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = StoreSettings::from_json(r#"{"atomic_save": false}"#).unwrap();
        assert!(!settings.atomic_save);
        assert_eq!(settings.max_file_size, MAX_CSV_FILE_SIZE);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = StoreSettings::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Settings { .. }));
    }
}
