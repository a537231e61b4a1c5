//! A single curated JSON table keyed by ORPHA code.
//!
//! Records are kept as raw JSON and decoded on lookup: one malformed record
//! only fails the disease it belongs to, not the whole table.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DataError, Result};

#[derive(Debug, Clone)]
pub struct CuratedTable {
    name: &'static str,
    records: HashMap<String, serde_json::Value>,
    present: bool,
}

impl CuratedTable {
    /// An empty table, as used when the file is absent.
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            records: HashMap::new(),
            present: false,
        }
    }

    /// Load `<dir>/<name>.json`. A missing file yields an empty table.
    pub fn load(dir: &Path, name: &'static str) -> Result<Self> {
        let path = dir.join(format!("{name}.json"));
        if !path.exists() {
            warn!(table = name, path = %path.display(), "Curated table not found, treating as empty");
            return Ok(Self::empty(name));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| DataError::Json {
                path: path.clone(),
                source,
            })?;
        let serde_json::Value::Object(map) = value else {
            return Err(DataError::NotAnObject(path));
        };

        let records: HashMap<String, serde_json::Value> = map
            .into_iter()
            .map(|(code, record)| (code.trim().to_string(), record))
            .collect();
        debug!(table = name, records = records.len(), "Curated table loaded");

        Ok(Self {
            name,
            records,
            present: true,
        })
    }

    /// Build a table from in-memory records.
    pub fn from_records(
        name: &'static str,
        records: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        Self {
            name,
            records: records.into_iter().collect(),
            present: true,
        }
    }

    /// Decode the record for `orpha_code`. `Ok(None)` when there is none;
    /// a JSON `null` record counts as none.
    pub fn lookup<T: DeserializeOwned>(&self, orpha_code: &str) -> Result<Option<T>> {
        match self.records.get(orpha_code) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(raw) => serde_json::from_value(raw.clone())
                .map(Some)
                .map_err(|e| DataError::MalformedRecord {
                    table: self.name,
                    orpha_code: orpha_code.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the backing file existed.
    pub fn is_present(&self) -> bool {
        self.present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = CuratedTable::load(dir.path(), "genes").unwrap();
        assert!(table.is_empty());
        assert!(!table.is_present());
        assert_eq!(table.lookup::<Vec<String>>("558").unwrap(), None);
    }

    #[test]
    fn test_non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("genes.json"), "[1, 2, 3]").unwrap();
        assert!(matches!(
            CuratedTable::load(dir.path(), "genes"),
            Err(DataError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_malformed_record_fails_only_that_code() {
        let table = CuratedTable::from_records(
            "genes",
            [
                ("558".to_string(), json!(["FBN1"])),
                ("166".to_string(), json!({"gene": 42})),
            ],
        );
        assert_eq!(
            table.lookup::<Vec<String>>("558").unwrap(),
            Some(vec!["FBN1".to_string()])
        );
        let err = table.lookup::<Vec<String>>("166").unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { table: "genes", .. }));
    }
}
