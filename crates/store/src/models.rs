//! On-disk dataset file format

use bankers_errors::{Error, StorageError};
use bankers_types::Dataset;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::SUPPORTED_VERSION;

/// Every named dataset, as written to the dataset file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub version: u32,
    #[serde(default)]
    pub datasets: BTreeMap<String, Dataset>,
}

impl Default for DatasetFile {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetFile {
    /// Create an empty file at the current schema version
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            datasets: BTreeMap::new(),
        }
    }

    /// Parse a dataset file.
    ///
    /// A top-level numeric `version` marks the versioned schema; anything
    /// else is read as the older bare `name -> dataset` map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CorruptedData` for malformed JSON and
    /// `StorageError::UnsupportedVersion` for files from a newer schema.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(json).map_err(|e| corrupted(&e))?;

        let file = if value.get("version").is_some_and(Value::is_u64) {
            serde_json::from_value::<Self>(value).map_err(|e| corrupted(&e))?
        } else {
            let datasets: BTreeMap<String, Dataset> =
                serde_json::from_value(value).map_err(|e| corrupted(&e))?;
            Self {
                version: SUPPORTED_VERSION,
                datasets,
            }
        };

        file.validate()?;
        Ok(file)
    }

    /// Serialize to pretty JSON at the current schema version
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            StorageError::CorruptedData {
                message: format!("failed to serialize datasets: {e}"),
            }
            .into()
        })
    }

    /// Check version compatibility and entry names
    ///
    /// # Errors
    ///
    /// Returns an error if the version is newer than supported or a dataset
    /// has an empty name.
    pub fn validate(&self) -> Result<(), Error> {
        if self.version > SUPPORTED_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSION,
            }
            .into());
        }

        if let Some(name) = self.datasets.keys().find(|name| name.trim().is_empty()) {
            return Err(StorageError::InvalidName { name: name.clone() }.into());
        }

        Ok(())
    }
}

fn corrupted(err: &serde_json::Error) -> StorageError {
    StorageError::CorruptedData {
        message: format!("invalid dataset file: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_versioned_file() {
        let json = r#"{
            "version": 1,
            "datasets": {
                "tiny": {
                    "num_processes": 1,
                    "num_resources": 1,
                    "allocation": [[0]],
                    "maximum": [[1]],
                    "available": [1]
                }
            }
        }"#;
        let file = DatasetFile::from_json(json).unwrap();
        assert_eq!(file.version, 1);
        assert_eq!(file.datasets["tiny"].maximum, vec![vec![1]]);
    }

    #[test]
    fn test_reads_legacy_map() {
        let legacy = serde_json::json!({ "classroom": Dataset::textbook() }).to_string();
        let file = DatasetFile::from_json(&legacy).unwrap();
        assert_eq!(file.version, SUPPORTED_VERSION);
        assert_eq!(file.datasets["classroom"], Dataset::textbook());
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = DatasetFile::from_json(r#"{"version": 7, "datasets": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::UnsupportedVersion {
                found: 7,
                supported: 1
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = DatasetFile::from_json("{ not json").unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_names() {
        let legacy = serde_json::json!({ "  ": Dataset::textbook() }).to_string();
        assert!(matches!(
            DatasetFile::from_json(&legacy).unwrap_err(),
            Error::Storage(StorageError::InvalidName { .. })
        ));
    }
}
