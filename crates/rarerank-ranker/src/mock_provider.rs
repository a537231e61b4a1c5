//! In-memory reference data for unit and integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rarerank_common::{Criterion, RareRankError, Result};
use rarerank_data::{DrugRegion, DrugType, TrialRegion};

use crate::provider::{
    DrugProvider, GeneProvider, GroupProvider, PrevalenceProvider, ReferenceData,
    SocioeconomicProvider, TrialProvider,
};

#[derive(Debug, Clone)]
struct MockDrug {
    id: String,
    usa: bool,
    tradename: bool,
}

#[derive(Debug, Clone)]
struct MockTrial {
    id: String,
    in_spain: bool,
    in_eu: bool,
}

/// Mock provider with hardcoded per-disease data.
#[derive(Debug, Clone, Default)]
pub struct MockDiseaseData {
    prevalence: HashMap<String, String>,
    evidence: HashMap<String, (String, Option<String>)>,
    drugs: HashMap<String, Vec<MockDrug>>,
    drug_names: HashMap<String, String>,
    trials: HashMap<String, Vec<MockTrial>>,
    genes: HashMap<String, Vec<String>>,
    groups: HashMap<String, Vec<String>>,
    malformed: HashSet<(String, Criterion)>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl MockDiseaseData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prevalence(mut self, orpha_code: &str, class: &str) -> Self {
        self.prevalence.insert(orpha_code.to_string(), class.to_string());
        self
    }

    pub fn with_evidence(mut self, orpha_code: &str, level: &str, justification: Option<&str>) -> Self {
        self.evidence.insert(
            orpha_code.to_string(),
            (level.to_string(), justification.map(str::to_string)),
        );
        self
    }

    pub fn with_eu_tradename_drugs(self, orpha_code: &str, ids: &[&str]) -> Self {
        self.with_drugs(orpha_code, ids, false, true)
    }

    pub fn with_eu_medical_products(self, orpha_code: &str, ids: &[&str]) -> Self {
        self.with_drugs(orpha_code, ids, false, false)
    }

    pub fn with_usa_tradename_drugs(self, orpha_code: &str, ids: &[&str]) -> Self {
        self.with_drugs(orpha_code, ids, true, true)
    }

    fn with_drugs(mut self, orpha_code: &str, ids: &[&str], usa: bool, tradename: bool) -> Self {
        self.drugs
            .entry(orpha_code.to_string())
            .or_default()
            .extend(ids.iter().map(|id| MockDrug {
                id: id.to_string(),
                usa,
                tradename,
            }));
        self
    }

    pub fn with_drug_name(mut self, drug_id: &str, name: &str) -> Self {
        self.drug_names.insert(drug_id.to_string(), name.to_string());
        self
    }

    /// Add `count` trials with a site in Spain (and therefore in the EU).
    pub fn with_spanish_trials(self, orpha_code: &str, count: usize) -> Self {
        self.with_trials(orpha_code, "ES", count, true, true)
    }

    /// Add `count` EU trials without a Spanish site.
    pub fn with_eu_trials(self, orpha_code: &str, count: usize) -> Self {
        self.with_trials(orpha_code, "EU", count, false, true)
    }

    /// Add `count` trials outside the EU.
    pub fn with_other_trials(self, orpha_code: &str, count: usize) -> Self {
        self.with_trials(orpha_code, "XX", count, false, false)
    }

    fn with_trials(
        mut self,
        orpha_code: &str,
        tag: &str,
        count: usize,
        in_spain: bool,
        in_eu: bool,
    ) -> Self {
        let trials = self.trials.entry(orpha_code.to_string()).or_default();
        let start = trials.len();
        trials.extend((start..start + count).map(|i| MockTrial {
            id: format!("NCT-{tag}-{orpha_code}-{i}"),
            in_spain,
            in_eu,
        }));
        self
    }

    pub fn with_genes(mut self, orpha_code: &str, genes: &[&str]) -> Self {
        self.genes.insert(orpha_code.to_string(), owned(genes));
        self
    }

    pub fn with_groups(mut self, orpha_code: &str, groups: &[&str]) -> Self {
        self.groups.insert(orpha_code.to_string(), owned(groups));
        self
    }

    /// Make every lookup backing `criterion` fail for `orpha_code`, as a
    /// malformed curated record would.
    pub fn with_malformed(mut self, orpha_code: &str, criterion: Criterion) -> Self {
        self.malformed.insert((orpha_code.to_string(), criterion));
        self
    }

    pub fn into_reference_data(self) -> ReferenceData {
        ReferenceData::from_shared(Arc::new(self))
    }

    fn check(&self, orpha_code: &str, criterion: Criterion) -> Result<()> {
        if self.malformed.contains(&(orpha_code.to_string(), criterion)) {
            return Err(RareRankError::MalformedRecord {
                table: criterion.key().to_string(),
                orpha_code: orpha_code.to_string(),
                reason: "injected malformed record".to_string(),
            });
        }
        Ok(())
    }
}

impl PrevalenceProvider for MockDiseaseData {
    fn prevalence_class(&self, orpha_code: &str) -> Result<Option<String>> {
        self.check(orpha_code, Criterion::Prevalence)?;
        Ok(self.prevalence.get(orpha_code).cloned())
    }
}

impl SocioeconomicProvider for MockDiseaseData {
    fn evidence_level(&self, orpha_code: &str) -> Result<Option<String>> {
        self.check(orpha_code, Criterion::Socioeconomic)?;
        Ok(self.evidence.get(orpha_code).map(|(level, _)| level.clone()))
    }

    fn justification(&self, orpha_code: &str) -> Result<Option<String>> {
        self.check(orpha_code, Criterion::Socioeconomic)?;
        Ok(self.evidence.get(orpha_code).and_then(|(_, text)| text.clone()))
    }
}

impl DrugProvider for MockDiseaseData {
    fn drugs_for_disease(
        &self,
        orpha_code: &str,
        region: DrugRegion,
        drug_type: DrugType,
    ) -> Result<Vec<String>> {
        self.check(orpha_code, Criterion::OrphaDrugs)?;
        let mut ids: Vec<String> = Vec::new();
        for drug in self.drugs.get(orpha_code).into_iter().flatten() {
            let region_ok = match region {
                DrugRegion::Eu => !drug.usa,
                DrugRegion::Usa => drug.usa,
                DrugRegion::All => true,
            };
            let type_ok = match drug_type {
                DrugType::Tradename => drug.tradename,
                DrugType::MedicalProduct => !drug.tradename,
                DrugType::All => true,
            };
            if region_ok && type_ok && !ids.contains(&drug.id) {
                ids.push(drug.id.clone());
            }
        }
        Ok(ids)
    }

    fn drug_name(&self, drug_id: &str) -> String {
        self.drug_names
            .get(drug_id)
            .cloned()
            .unwrap_or_else(|| format!("Desconocido ({drug_id})"))
    }
}

impl TrialProvider for MockDiseaseData {
    fn trials_for_disease(&self, orpha_code: &str, region: TrialRegion) -> Result<Vec<String>> {
        self.check(orpha_code, Criterion::ClinicalTrials)?;
        Ok(self
            .trials
            .get(orpha_code)
            .into_iter()
            .flatten()
            .filter(|t| match region {
                TrialRegion::Spain => t.in_spain,
                TrialRegion::Eu => t.in_eu || t.in_spain,
                TrialRegion::All => true,
            })
            .map(|t| t.id.clone())
            .collect())
    }
}

impl GeneProvider for MockDiseaseData {
    fn genes_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.check(orpha_code, Criterion::OrphaGene)?;
        Ok(self.genes.get(orpha_code).cloned().unwrap_or_default())
    }
}

impl GroupProvider for MockDiseaseData {
    fn groups_for_disease(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.check(orpha_code, Criterion::Groups)?;
        Ok(self.groups.get(orpha_code).cloned().unwrap_or_default())
    }
}
