//! Shared fixtures for rarerank tests: a known-good configuration, curated
//! tables written into a temporary directory and disease batches.

use std::path::{Path, PathBuf};

use rarerank_common::DiseaseIdentity;
use rarerank_config::PrioritizationConfig;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Complete configuration with no mocked criteria. Paths are placeholders;
/// see [`sample_config_yaml`] for a configuration pointing at real files.
pub const SAMPLE_CONFIG_YAML: &str = r#"
input:
  data_source: diseases.json
data:
  base_path: curated
criteria:
  prevalence:
    weight: 0.20
    mock_value: 5.0
    scoring:
      class_mapping:
        "<1 / 1 000 000": 10
        "1-9 / 1 000 000": 8
        "1-9 / 100 000": 6
        "1-5 / 10 000": 4
        "6-9 / 10 000": 2
        ">1 / 1000": 1
      handle_missing_data: zero_score
  socioeconomic:
    weight: 0.20
    mock_value: 5.0
    scoring:
      evidence_mappings:
        "High evidence": 10
        "Medium evidence": 6
        "Low evidence": 3
        "No evidence": 0
      handle_missing_data: zero_score
  orpha_drugs:
    weight: 0.20
    scoring:
      components:
        - source: eu_tradename_drugs
          weight: 0.8
          max: 10
          scale_factor: 10
        - source: medical_products_eu
          weight: 0.2
          max: 20
          scale_factor: 10
  clinical_trials:
    weight: 0.15
    scoring:
      source_preference: spanish_trials
      fallback: eu_trials
      max: 100
      scale_factor: 10
  orpha_gene:
    weight: 0.10
  groups:
    weight: 0.15
    scoring:
      max: 3
      scale_factor: 10
output:
  base_path: results
  filename: priorizacion_enfermedades_raras
  top_n: 15
  output_final_top_n: true
"#;

pub fn sample_config() -> PrioritizationConfig {
    PrioritizationConfig::from_yaml_str(SAMPLE_CONFIG_YAML).expect("sample config is valid")
}

/// The sample configuration with its input, data and output paths replaced.
pub fn sample_config_yaml(data_source: &Path, data_dir: &Path, output_dir: &Path) -> String {
    SAMPLE_CONFIG_YAML
        .replace(
            "data_source: diseases.json",
            &format!("data_source: {}", yaml_path(data_source)),
        )
        .replace(
            "base_path: curated",
            &format!("base_path: {}", yaml_path(data_dir)),
        )
        .replace(
            "base_path: results",
            &format!("base_path: {}", yaml_path(output_dir)),
        )
}

fn yaml_path(path: &Path) -> String {
    format!("'{}'", path.display())
}

// ── Diseases ────────────────────────────────────────────────────────────────

/// Three well-known diseases, matching [`CuratedDataDir::with_sample_tables`].
pub fn sample_diseases() -> Vec<DiseaseIdentity> {
    vec![
        DiseaseIdentity::new("558", "Síndrome de Marfan"),
        DiseaseIdentity::new("586", "Fibrosis quística"),
        DiseaseIdentity::new("166", "Ataxia de Friedreich"),
    ]
}

/// `n` synthetic diseases with codes `1000..1000+n`.
pub fn disease_batch(n: usize) -> Vec<DiseaseIdentity> {
    (0..n)
        .map(|i| DiseaseIdentity::new((1000 + i).to_string(), format!("Enfermedad sintética {i}")))
        .collect()
}

/// Write a disease list as the JSON array the loader expects.
pub fn write_disease_list(dir: &Path, diseases: &[DiseaseIdentity]) -> PathBuf {
    let path = dir.join("diseases.json");
    let list: Vec<Value> = diseases
        .iter()
        .map(|d| json!({"orpha_code": d.orpha_code, "disease_name": d.disease_name}))
        .collect();
    std::fs::write(&path, Value::Array(list).to_string()).expect("write disease list");
    path
}

// ── Curated tables ──────────────────────────────────────────────────────────

/// Curated JSON tables in a temporary directory, removed on drop.
pub struct CuratedDataDir {
    dir: TempDir,
}

impl CuratedDataDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<name>.json`.
    pub fn write_table(&self, name: &str, table: Value) -> &Self {
        std::fs::write(self.path().join(format!("{name}.json")), table.to_string())
            .expect("write curated table");
        self
    }

    /// Tables covering [`sample_diseases`].
    pub fn with_sample_tables(self) -> Self {
        self.write_table(
            "prevalence",
            json!({
                "558": {"prevalence_class": "1-5 / 10 000"},
                "586": {"prevalence_class": "1-9 / 100 000"},
                "166": {"prevalence_class": "1-9 / 100 000"}
            }),
        )
        .write_table(
            "socioeconomic",
            json!({
                "558": {"evidence_level": "Medium evidence", "justification": "Seguimiento cardiovascular de por vida."},
                "586": {"evidence_level": "High evidence", "justification": "Alto coste de tratamiento crónico."}
            }),
        )
        .write_table(
            "drugs",
            json!({
                "586": [
                    {"drug_id": "EU/3/08/556", "region": "eu", "drug_type": "tradename"},
                    {"drug_id": "EU/3/12/1001", "region": "eu", "drug_type": "tradename"},
                    {"drug_id": "MP-586-1", "region": "eu", "drug_type": "medical_product"}
                ]
            }),
        )
        .write_table(
            "drug_names",
            json!({"EU/3/08/556": "Kalydeco", "EU/3/12/1001": "Orkambi"}),
        )
        .write_table(
            "trials",
            json!({
                "586": [
                    {"nct_id": "NCT04058366", "in_spain": true, "in_eu": true},
                    {"nct_id": "NCT03691779", "in_eu": true}
                ],
                "166": [
                    {"nct_id": "NCT02797080", "in_eu": true},
                    {"nct_id": "NCT04102501"}
                ]
            }),
        )
        .write_table(
            "genes",
            json!({"558": ["FBN1"], "586": ["CFTR"], "166": ["FXN"]}),
        )
        .write_table(
            "groups",
            json!({
                "558": ["CIBERER U705"],
                "166": ["CIBERER U732", "IIS La Fe", "IBV-CSIC"]
            }),
        );
        self
    }
}

impl Default for CuratedDataDir {
    fn default() -> Self {
        Self::new()
    }
}
