//! rarerank-config — Prioritization run configuration.
//!
//! Loaded from YAML, JSON or TOML (chosen by file extension) and validated
//! eagerly: a run never starts scoring with a broken configuration.

pub mod criteria;
mod validate;


use std::path::{Path, PathBuf};

use rarerank_common::{RareRankError, Result};
use serde::{Deserialize, Serialize};

pub use criteria::{
    CriteriaConfig, CriterionConfig, DrugComponent, DrugScoring, DrugSource, GeneScoring,
    GroupScoring, MissingDataPolicy, PrevalenceScoring, SocioeconomicScoring, TrialScoring,
    TrialSource, DEFAULT_SCALE_FACTOR,
};

/// Top-level sections that must be present in every configuration document.
pub const REQUIRED_SECTIONS: [&str; 3] = ["input", "output", "criteria"];

/// Complete prioritization run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizationConfig {
    pub input: InputConfig,

    /// Curated reference tables
    #[serde(default)]
    pub data: DataConfig,

    pub criteria: CriteriaConfig,

    pub output: OutputConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the JSON list of diseases to prioritize
    pub data_source: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub base_path: PathBuf,
}

fn default_data_path() -> PathBuf { PathBuf::from("data/curated") }

impl Default for DataConfig {
    fn default() -> Self {
        Self { base_path: default_data_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub base_path: PathBuf,

    /// File stem shared by every artifact of the run
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Number of diseases in the top-N exports
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Also write the top-N `{disease_name, orpha_code}` JSON list
    #[serde(default = "default_true")]
    pub output_final_top_n: bool,
}

fn default_output_path() -> PathBuf { PathBuf::from("results") }
fn default_filename()    -> String  { "priorizacion_enfermedades_raras".to_string() }
fn default_top_n()       -> usize   { 15 }
fn default_true()        -> bool    { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: default_output_path(),
            filename: default_filename(),
            top_n: default_top_n(),
            output_final_top_n: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Batches larger than this are scored in parallel; 0 keeps every run sequential.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize { 32 }

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel_threshold: default_parallel_threshold() }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(RareRankError::Config(format!(
                "unsupported configuration format: {} (expected .yaml, .yml, .json or .toml)",
                path.display()
            ))),
        }
    }
}

impl PrioritizationConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RareRankError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, DocumentFormat::Yaml)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, DocumentFormat::Json)
    }

    fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        let document: serde_json::Value = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Toml => toml::from_str(content)?,
        };

        check_required_sections(&document)?;

        let config: Self = serde_json::from_value(document)
            .map_err(|e| RareRankError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, output: Option<PathBuf>, top_n: Option<usize>) -> Result<()> {
        if let Some(path) = output {
            self.output.base_path = path;
        }
        if let Some(n) = top_n {
            if n == 0 {
                return Err(RareRankError::Config("top_n must be greater than 0".to_string()));
            }
            self.output.top_n = n;
        }
        Ok(())
    }
}

fn check_required_sections(document: &serde_json::Value) -> Result<()> {
    let Some(map) = document.as_object() else {
        return Err(RareRankError::Config(
            "configuration root must be a mapping".to_string(),
        ));
    };
    for section in REQUIRED_SECTIONS {
        match map.get(section) {
            None | Some(serde_json::Value::Null) => {
                return Err(RareRankError::MissingSection(section))
            }
            Some(_) => {}
        }
    }
    Ok(())
}
