//! Curated reference data store.
//!
//! # Tables
//!
//! | File | Record per ORPHA code |
//! |------|-----------------------|
//! | `prevalence.json` | `{"prevalence_class": "1-9 / 100 000"}` |
//! | `socioeconomic.json` | `{"evidence_level": "High evidence", "justification": "..."}` |
//! | `drugs.json` | `[{"drug_id": "...", "region": "eu", "drug_type": "tradename"}]` |
//! | `drug_names.json` | drug id → `"Trade name"` |
//! | `trials.json` | `[{"nct_id": "NCT...", "in_spain": true, "in_eu": true}]` |
//! | `genes.json` | `["FBN1"]` |
//! | `groups.json` | `["Group name"]` |

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::ordered::OrderedIdSet;
use crate::table::CuratedTable;

pub const PREVALENCE_TABLE: &str = "prevalence";
pub const SOCIOECONOMIC_TABLE: &str = "socioeconomic";
pub const DRUGS_TABLE: &str = "drugs";
pub const DRUG_NAMES_TABLE: &str = "drug_names";
pub const TRIALS_TABLE: &str = "trials";
pub const GENES_TABLE: &str = "genes";
pub const GROUPS_TABLE: &str = "groups";

// ── Query selectors ─────────────────────────────────────────────────────────

/// Market where a drug is authorised, as recorded in `drugs.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Eu,
    Usa,
}

/// Kind of authorised product, as recorded in `drugs.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Tradename,
    MedicalProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrugRegion {
    Eu,
    Usa,
    All,
}

impl DrugRegion {
    fn matches(self, market: Market) -> bool {
        match self {
            DrugRegion::Eu => market == Market::Eu,
            DrugRegion::Usa => market == Market::Usa,
            DrugRegion::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrugType {
    Tradename,
    MedicalProduct,
    All,
}

impl DrugType {
    fn matches(self, kind: ProductKind) -> bool {
        match self {
            DrugType::Tradename => kind == ProductKind::Tradename,
            DrugType::MedicalProduct => kind == ProductKind::MedicalProduct,
            DrugType::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialRegion {
    /// Trials with at least one site in Spain.
    Spain,
    /// Trials with at least one site in the EU (Spain included).
    Eu,
    All,
}

// ── Record shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PrevalenceRecord {
    prevalence_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SocioeconomicRecord {
    evidence_level: Option<String>,
    #[serde(default)]
    justification: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrugRecord {
    drug_id: String,
    region: Market,
    drug_type: ProductKind,
}

#[derive(Debug, Deserialize)]
struct TrialRecord {
    nct_id: String,
    #[serde(default)]
    in_spain: bool,
    #[serde(default)]
    in_eu: bool,
}

// ── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Tables {
    prevalence: CuratedTable,
    socioeconomic: CuratedTable,
    drugs: CuratedTable,
    drug_names: CuratedTable,
    trials: CuratedTable,
    genes: CuratedTable,
    groups: CuratedTable,
}

impl Tables {
    fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            prevalence: CuratedTable::load(dir, PREVALENCE_TABLE)?,
            socioeconomic: CuratedTable::load(dir, SOCIOECONOMIC_TABLE)?,
            drugs: CuratedTable::load(dir, DRUGS_TABLE)?,
            drug_names: CuratedTable::load(dir, DRUG_NAMES_TABLE)?,
            trials: CuratedTable::load(dir, TRIALS_TABLE)?,
            genes: CuratedTable::load(dir, GENES_TABLE)?,
            groups: CuratedTable::load(dir, GROUPS_TABLE)?,
        })
    }

    fn all(&self) -> [&CuratedTable; 7] {
        [
            &self.prevalence,
            &self.socioeconomic,
            &self.drugs,
            &self.drug_names,
            &self.trials,
            &self.genes,
            &self.groups,
        ]
    }
}

/// Immutable snapshot of every curated table under one directory.
#[derive(Debug, Clone)]
pub struct CuratedStore {
    tables: Tables,
    data_dir: PathBuf,
}

impl CuratedStore {
    /// Load every table under `data_dir`. Absent files become empty tables.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let tables = Tables::load(&data_dir)?;
        let store = Self { tables, data_dir };
        store.log_summary();
        Ok(store)
    }

    /// Re-read every table from disk, replacing the current snapshot only if
    /// all tables load.
    pub fn reload(&mut self) -> Result<()> {
        self.tables = Tables::load(&self.data_dir)?;
        self.log_summary();
        Ok(())
    }

    fn log_summary(&self) {
        let present = self.tables.all().iter().filter(|t| t.is_present()).count();
        info!(
            "Curated data ready from {:?}: {}/7 tables, {} prevalence, {} drug, {} trial, {} gene, {} group records",
            self.data_dir,
            present,
            self.tables.prevalence.len(),
            self.tables.drugs.len(),
            self.tables.trials.len(),
            self.tables.genes.len(),
            self.tables.groups.len(),
        );
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Table names whose file was absent at load time.
    pub fn missing_tables(&self) -> Vec<&'static str> {
        self.tables
            .all()
            .iter()
            .filter(|t| !t.is_present())
            .map(|t| t.name())
            .collect()
    }

    // ── Prevalence / socioeconomic ──────────────────────────────────────────

    pub fn get_prevalence_class(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self
            .tables
            .prevalence
            .lookup::<PrevalenceRecord>(orpha_code)?
            .and_then(|r| non_blank(r.prevalence_class)))
    }

    pub fn get_evidence_level_for_disease(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self
            .tables
            .socioeconomic
            .lookup::<SocioeconomicRecord>(orpha_code)?
            .and_then(|r| non_blank(r.evidence_level)))
    }

    pub fn get_justification_for_disease(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self
            .tables
            .socioeconomic
            .lookup::<SocioeconomicRecord>(orpha_code)?
            .and_then(|r| non_blank(r.justification)))
    }

    // ── Drugs ───────────────────────────────────────────────────────────────

    /// Drug ids for a disease, filtered by market and product kind,
    /// de-duplicated in first-seen order.
    pub fn get_drugs_for_disease(
        &self,
        orpha_code: &str,
        region: DrugRegion,
        drug_type: DrugType,
    ) -> Result<Vec<String>> {
        let records: Vec<DrugRecord> = self.tables.drugs.lookup(orpha_code)?.unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| region.matches(r.region) && drug_type.matches(r.drug_type))
            .map(|r| r.drug_id)
            .collect::<OrderedIdSet>()
            .into_vec())
    }

    pub fn get_eu_tradename_drugs_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.get_drugs_for_disease(orpha_code, DrugRegion::Eu, DrugType::Tradename)
    }

    pub fn get_eu_medical_products_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.get_drugs_for_disease(orpha_code, DrugRegion::Eu, DrugType::MedicalProduct)
    }

    /// Display name for a drug id. Never fails: unknown or malformed
    /// entries get a placeholder.
    pub fn get_drug_name(&self, drug_id: &str) -> String {
        match self.tables.drug_names.lookup::<String>(drug_id) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            _ => format!("Desconocido ({drug_id})"),
        }
    }

    // ── Trials ──────────────────────────────────────────────────────────────

    pub fn get_trials_for_disease(&self, orpha_code: &str, region: TrialRegion) -> Result<Vec<String>> {
        let records: Vec<TrialRecord> = self.tables.trials.lookup(orpha_code)?.unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| match region {
                TrialRegion::Spain => r.in_spain,
                TrialRegion::Eu => r.in_eu || r.in_spain,
                TrialRegion::All => true,
            })
            .map(|r| r.nct_id)
            .collect::<OrderedIdSet>()
            .into_vec())
    }

    pub fn get_spanish_trials_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.get_trials_for_disease(orpha_code, TrialRegion::Spain)
    }

    pub fn get_eu_trials_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.get_trials_for_disease(orpha_code, TrialRegion::Eu)
    }

    pub fn get_all_trials_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.get_trials_for_disease(orpha_code, TrialRegion::All)
    }

    // ── Genes / groups ──────────────────────────────────────────────────────

    /// Genes exactly as curated. The gene criterion counts entries, so the
    /// list is neither trimmed nor de-duplicated.
    pub fn get_genes_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        Ok(self.tables.genes.lookup(orpha_code)?.unwrap_or_default())
    }

    pub fn get_groups_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        let groups: Vec<String> = self.tables.groups.lookup(orpha_code)?.unwrap_or_default();
        Ok(groups
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect::<OrderedIdSet>()
            .into_vec())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, value: serde_json::Value) {
        std::fs::write(dir.join(format!("{name}.json")), value.to_string()).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, CuratedStore) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PREVALENCE_TABLE, json!({
            "558": {"prevalence_class": "1-5 / 10 000"},
            "166": {"prevalence_class": "  "}
        }));
        write(dir.path(), DRUGS_TABLE, json!({
            "558": [
                {"drug_id": "D1", "region": "eu", "drug_type": "tradename"},
                {"drug_id": "D2", "region": "eu", "drug_type": "medical_product"},
                {"drug_id": "D1", "region": "eu", "drug_type": "tradename"},
                {"drug_id": "D3", "region": "usa", "drug_type": "tradename"}
            ]
        }));
        write(dir.path(), DRUG_NAMES_TABLE, json!({"D1": "Vyndaqel"}));
        write(dir.path(), TRIALS_TABLE, json!({
            "558": [
                {"nct_id": "NCT1", "in_spain": true, "in_eu": true},
                {"nct_id": "NCT2", "in_eu": true},
                {"nct_id": "NCT3"},
                {"nct_id": "NCT2", "in_eu": true}
            ]
        }));
        write(dir.path(), GENES_TABLE, json!({"558": ["FBN1", "FBN1 "], "999": "FBN1"}));
        let store = CuratedStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_absent_tables_degrade_to_no_data() {
        let (_dir, store) = fixture();
        let mut missing = store.missing_tables();
        missing.sort_unstable();
        assert_eq!(missing, vec![GROUPS_TABLE, SOCIOECONOMIC_TABLE]);
        assert_eq!(store.get_evidence_level_for_disease("558").unwrap(), None);
        assert!(store.get_groups_for_disease("558").unwrap().is_empty());
    }

    #[test]
    fn test_prevalence_blank_is_none() {
        let (_dir, store) = fixture();
        assert_eq!(
            store.get_prevalence_class("558").unwrap().as_deref(),
            Some("1-5 / 10 000")
        );
        assert_eq!(store.get_prevalence_class("166").unwrap(), None);
        assert_eq!(store.get_prevalence_class("404").unwrap(), None);
    }

    #[test]
    fn test_drug_filters_and_dedup() {
        let (_dir, store) = fixture();
        assert_eq!(store.get_eu_tradename_drugs_for_disease("558").unwrap(), vec!["D1"]);
        assert_eq!(store.get_eu_medical_products_for_disease("558").unwrap(), vec!["D2"]);
        assert_eq!(
            store.get_drugs_for_disease("558", DrugRegion::All, DrugType::All).unwrap(),
            vec!["D1", "D2", "D3"]
        );
        assert_eq!(
            store.get_drugs_for_disease("558", DrugRegion::Usa, DrugType::All).unwrap(),
            vec!["D3"]
        );
    }

    #[test]
    fn test_drug_name_placeholder() {
        let (_dir, store) = fixture();
        assert_eq!(store.get_drug_name("D1"), "Vyndaqel");
        assert_eq!(store.get_drug_name("D9"), "Desconocido (D9)");
    }

    #[test]
    fn test_trial_regions() {
        let (_dir, store) = fixture();
        assert_eq!(store.get_spanish_trials_for_disease("558").unwrap(), vec!["NCT1"]);
        assert_eq!(store.get_eu_trials_for_disease("558").unwrap(), vec!["NCT1", "NCT2"]);
        assert_eq!(
            store.get_all_trials_for_disease("558").unwrap(),
            vec!["NCT1", "NCT2", "NCT3"]
        );
    }

    #[test]
    fn test_genes_kept_as_curated_and_malformed() {
        let (_dir, store) = fixture();
        assert_eq!(store.get_genes_for_disease("558").unwrap(), vec!["FBN1", "FBN1 "]);
        assert!(store.get_genes_for_disease("404").unwrap().is_empty());
        assert!(store.get_genes_for_disease("999").is_err());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let (dir, mut store) = fixture();
        write(dir.path(), GROUPS_TABLE, json!({"558": ["U123"]}));
        assert!(store.get_groups_for_disease("558").unwrap().is_empty());
        store.reload().unwrap();
        assert_eq!(store.get_groups_for_disease("558").unwrap(), vec!["U123"]);
    }
}
