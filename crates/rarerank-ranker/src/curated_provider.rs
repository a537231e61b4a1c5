//! Adapter that exposes a [`CuratedStore`] snapshot through the provider traits.

use std::path::Path;
use std::sync::Arc;

use rarerank_common::Result;
use rarerank_data::{CuratedStore, DrugRegion, DrugType, TrialRegion};

use crate::provider::{
    DrugProvider, GeneProvider, GroupProvider, PrevalenceProvider, ReferenceData,
    SocioeconomicProvider, TrialProvider,
};

/// Wraps a loaded [`CuratedStore`] to implement every provider trait.
pub struct CuratedDataAdapter {
    store: CuratedStore,
}

impl CuratedDataAdapter {
    pub fn new(store: CuratedStore) -> Self {
        Self { store }
    }

    /// Load the curated tables under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let store = CuratedStore::open(data_dir.as_ref())?;
        Ok(Self { store })
    }

    /// Get the underlying store.
    pub fn store(&self) -> &CuratedStore {
        &self.store
    }

    pub fn into_reference_data(self) -> ReferenceData {
        ReferenceData::from_shared(Arc::new(self))
    }
}

impl PrevalenceProvider for CuratedDataAdapter {
    fn prevalence_class(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self.store.get_prevalence_class(orpha_code)?)
    }
}

impl SocioeconomicProvider for CuratedDataAdapter {
    fn evidence_level(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self.store.get_evidence_level_for_disease(orpha_code)?)
    }

    fn justification(&self, orpha_code: &str) -> Result<Option<String>> {
        Ok(self.store.get_justification_for_disease(orpha_code)?)
    }
}

impl DrugProvider for CuratedDataAdapter {
    fn drugs_for_disease(
        &self,
        orpha_code: &str,
        region: DrugRegion,
        drug_type: DrugType,
    ) -> Result<Vec<String>> {
        Ok(self.store.get_drugs_for_disease(orpha_code, region, drug_type)?)
    }

    fn drug_name(&self, drug_id: &str) -> String {
        self.store.get_drug_name(drug_id)
    }
}

impl TrialProvider for CuratedDataAdapter {
    fn trials_for_disease(&self, orpha_code: &str, region: TrialRegion) -> Result<Vec<String>> {
        Ok(self.store.get_trials_for_disease(orpha_code, region)?)
    }
}

impl GeneProvider for CuratedDataAdapter {
    fn genes_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        Ok(self.store.get_genes_for_disease(orpha_code)?)
    }
}

impl GroupProvider for CuratedDataAdapter {
    fn groups_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        Ok(self.store.get_groups_for_disease(orpha_code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rarerank_common::RareRankError;
    use serde_json::json;

    #[test]
    fn test_adapter_reads_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("genes.json"),
            json!({"558": ["FBN1"], "166": {"gene": 1}}).to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("trials.json"),
            json!({"558": [{"nct_id": "NCT1", "in_eu": true}]}).to_string(),
        )
        .unwrap();

        let data = CuratedDataAdapter::open(dir.path()).unwrap().into_reference_data();
        assert_eq!(data.genes.genes_for_disease("558").unwrap(), vec!["FBN1"]);
        assert!(data.trials.spanish_trials("558").unwrap().is_empty());
        assert_eq!(data.trials.eu_trials("558").unwrap(), vec!["NCT1"]);
        assert_eq!(data.prevalence.prevalence_class("558").unwrap(), None);

        let err = data.genes.genes_for_disease("166").unwrap_err();
        assert!(matches!(err, RareRankError::MalformedRecord { .. }));
    }

    #[test]
    fn test_duplicate_gene_entries_are_not_monogenic() {
        use crate::scorer::score_orpha_gene;
        use rarerank_config::{CriterionConfig, GeneScoring};

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("genes.json"),
            json!({"558": ["FBN1"], "586": ["CFTR", "CFTR"]}).to_string(),
        )
        .unwrap();
        let adapter = CuratedDataAdapter::open(dir.path()).unwrap();
        let config = CriterionConfig {
            weight: 0.1,
            mock: false,
            mock_value: 0.0,
            scoring: GeneScoring::default(),
        };
        assert_eq!(score_orpha_gene("558", &config, &adapter).unwrap(), 10.0);
        assert_eq!(score_orpha_gene("586", &config, &adapter).unwrap(), 0.0);
    }
}
