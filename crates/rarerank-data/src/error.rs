//! Data store error types.

use std::path::PathBuf;

use rarerank_common::RareRankError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Table {0} must be a JSON object keyed by ORPHA code")]
    NotAnObject(PathBuf),

    #[error("Malformed {table} record for ORPHA:{orpha_code}: {reason}")]
    MalformedRecord {
        table: &'static str,
        orpha_code: String,
        reason: String,
    },
}

impl From<DataError> for RareRankError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::MalformedRecord { table, orpha_code, reason } => {
                RareRankError::MalformedRecord {
                    table: table.to_string(),
                    orpha_code,
                    reason,
                }
            }
            DataError::Io { source, .. } => RareRankError::Io(source),
            other => RareRankError::Other(other.into()),
        }
    }
}
