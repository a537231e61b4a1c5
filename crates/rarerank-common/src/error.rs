use thiserror::Error;

use crate::entities::Criterion;

#[derive(Debug, Error)]
pub enum RareRankError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required configuration section: {0}")]
    MissingSection(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Malformed {table} record for ORPHA:{orpha_code}: {reason}")]
    MalformedRecord {
        table: String,
        orpha_code: String,
        reason: String,
    },

    #[error("Score for {criterion} out of range [0, 10]: {value}")]
    InvalidScore { criterion: Criterion, value: f64 },

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RareRankError>;
