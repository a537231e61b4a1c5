//! Traits for reference data access.
//!
//! The scorers and justification generators only see these traits, so the
//! curated JSON snapshot and the in-memory test double are interchangeable.
//! Every lookup returns `Result`: a malformed record for one disease is an
//! error for that disease only.

use std::sync::Arc;

use rarerank_common::Result;
use rarerank_config::{DrugSource, TrialSource};
use rarerank_data::{DrugRegion, DrugType, TrialRegion};

pub trait PrevalenceProvider: Send + Sync {
    /// Orphanet prevalence class label (e.g. "<1 / 1 000 000").
    fn prevalence_class(&self, orpha_code: &str) -> Result<Option<String>>;
}

pub trait SocioeconomicProvider: Send + Sync {
    /// Evidence level label for published socioeconomic impact.
    fn evidence_level(&self, orpha_code: &str) -> Result<Option<String>>;

    /// Curated free-text justification accompanying the evidence level.
    fn justification(&self, orpha_code: &str) -> Result<Option<String>>;
}

pub trait DrugProvider: Send + Sync {
    /// Drug ids approved for a disease, filtered by market and product kind.
    fn drugs_for_disease(
        &self,
        orpha_code: &str,
        region: DrugRegion,
        drug_type: DrugType,
    ) -> Result<Vec<String>>;

    /// Display name for a drug id. Never fails.
    fn drug_name(&self, drug_id: &str) -> String;

    fn eu_tradename_drugs(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.drugs_for_disease(orpha_code, DrugRegion::Eu, DrugType::Tradename)
    }

    fn eu_medical_products(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.drugs_for_disease(orpha_code, DrugRegion::Eu, DrugType::MedicalProduct)
    }

    /// Drugs counted by one configured scoring component.
    fn drugs_from(&self, orpha_code: &str, source: DrugSource) -> Result<Vec<String>> {
        match source {
            DrugSource::EuTradenameDrugs => self.eu_tradename_drugs(orpha_code),
            DrugSource::MedicalProductsEu => self.eu_medical_products(orpha_code),
        }
    }
}

pub trait TrialProvider: Send + Sync {
    /// Trial ids for a disease. `Eu` includes Spanish sites.
    fn trials_for_disease(&self, orpha_code: &str, region: TrialRegion) -> Result<Vec<String>>;

    fn spanish_trials(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.trials_for_disease(orpha_code, TrialRegion::Spain)
    }

    fn eu_trials(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.trials_for_disease(orpha_code, TrialRegion::Eu)
    }

    fn all_trials(&self, orpha_code: &str) -> Result<Vec<String>> {
        self.trials_for_disease(orpha_code, TrialRegion::All)
    }

    fn trials_from(&self, orpha_code: &str, source: TrialSource) -> Result<Vec<String>> {
        match source {
            TrialSource::SpanishTrials => self.spanish_trials(orpha_code),
            TrialSource::EuTrials => self.eu_trials(orpha_code),
            TrialSource::AllTrials => self.all_trials(orpha_code),
        }
    }
}

pub trait GeneProvider: Send + Sync {
    /// Causal genes associated with a disease.
    fn genes_for_disease(&self, orpha_code: &str) -> Result<Vec<String>>;
}

pub trait GroupProvider: Send + Sync {
    /// Names of research groups working on a disease.
    fn groups_for_disease(&self, orpha_code: &str) -> Result<Vec<String>>;
}

/// One handle per collaborator, shared read-only by every scoring worker.
#[derive(Clone)]
pub struct ReferenceData {
    pub prevalence: Arc<dyn PrevalenceProvider>,
    pub socioeconomic: Arc<dyn SocioeconomicProvider>,
    pub drugs: Arc<dyn DrugProvider>,
    pub trials: Arc<dyn TrialProvider>,
    pub genes: Arc<dyn GeneProvider>,
    pub groups: Arc<dyn GroupProvider>,
}

impl ReferenceData {
    /// Use a single source for all six lookups.
    pub fn from_shared<P>(source: Arc<P>) -> Self
    where
        P: PrevalenceProvider
            + SocioeconomicProvider
            + DrugProvider
            + TrialProvider
            + GeneProvider
            + GroupProvider
            + 'static,
    {
        Self {
            prevalence: source.clone(),
            socioeconomic: source.clone(),
            drugs: source.clone(),
            trials: source.clone(),
            genes: source.clone(),
            groups: source,
        }
    }
}

impl std::fmt::Debug for ReferenceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceData").finish_non_exhaustive()
    }
}
