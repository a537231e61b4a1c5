//! Per-criterion configuration blocks.
//!
//! Each criterion shares `weight`/`mock`/`mock_value` and carries its own
//! `scoring` sub-document. String-valued selectors (data sources, missing-data
//! policy) are closed enums so a misspelled value fails at load time.

use std::collections::BTreeMap;

use rarerank_common::Criterion;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE_FACTOR: f64 = 10.0;

fn default_scale_factor() -> f64 { DEFAULT_SCALE_FACTOR }
fn default_trial_max()    -> f64 { 100.0 }
fn default_group_max()    -> f64 { 3.0 }

// ── Shared shape ─────────────────────────────────────────────────────────────

/// Common fields of every criterion plus its scoring block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub struct CriterionConfig<S> {
    pub weight: f64,

    /// Bypass the data and return `mock_value` (staged rollout).
    #[serde(default)]
    pub mock: bool,

    #[serde(default)]
    pub mock_value: f64,

    #[serde(default)]
    pub scoring: S,
}

/// What a table-lookup scorer does when no class/level is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    #[default]
    ZeroScore,
    #[serde(alias = "mock", alias = "use_mock")]
    MockValue,
}

// ── Criterion-specific scoring blocks ────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrevalenceScoring {
    /// Prevalence class label → score.
    #[serde(default)]
    pub class_mapping: BTreeMap<String, f64>,
    #[serde(default)]
    pub handle_missing_data: MissingDataPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocioeconomicScoring {
    /// Evidence level label → score.
    #[serde(default)]
    pub evidence_mappings: BTreeMap<String, f64>,
    #[serde(default)]
    pub handle_missing_data: MissingDataPolicy,
}

/// Data source counted by one orphan-drug component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrugSource {
    #[serde(rename = "eu_tradename_drugs")]
    EuTradenameDrugs,
    #[serde(rename = "medical_products_eu", alias = "eu_medical_products")]
    MedicalProductsEu,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugComponent {
    pub source: DrugSource,
    pub weight: f64,
    /// Winsorization ceiling.
    pub max: f64,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrugScoring {
    #[serde(default)]
    pub components: Vec<DrugComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialSource {
    SpanishTrials,
    EuTrials,
    AllTrials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialScoring {
    pub source_preference: TrialSource,
    /// Consulted only when the preferred source reports zero trials.
    #[serde(default)]
    pub fallback: Option<TrialSource>,
    #[serde(default = "default_trial_max")]
    pub max: f64,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

impl Default for TrialScoring {
    fn default() -> Self {
        Self {
            source_preference: TrialSource::SpanishTrials,
            fallback: None,
            max: default_trial_max(),
            scale_factor: default_scale_factor(),
        }
    }
}

/// The gene criterion is a fixed binary rule; nothing to configure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneScoring {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupScoring {
    #[serde(default = "default_group_max")]
    pub max: f64,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

impl Default for GroupScoring {
    fn default() -> Self {
        Self {
            max: default_group_max(),
            scale_factor: default_scale_factor(),
        }
    }
}

// ── All six ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaConfig {
    pub prevalence: CriterionConfig<PrevalenceScoring>,
    pub socioeconomic: CriterionConfig<SocioeconomicScoring>,
    pub orpha_drugs: CriterionConfig<DrugScoring>,
    pub clinical_trials: CriterionConfig<TrialScoring>,
    pub orpha_gene: CriterionConfig<GeneScoring>,
    pub groups: CriterionConfig<GroupScoring>,
}

impl CriteriaConfig {
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Prevalence => self.prevalence.weight,
            Criterion::Socioeconomic => self.socioeconomic.weight,
            Criterion::OrphaDrugs => self.orpha_drugs.weight,
            Criterion::ClinicalTrials => self.clinical_trials.weight,
            Criterion::OrphaGene => self.orpha_gene.weight,
            Criterion::Groups => self.groups.weight,
        }
    }

    /// `Some(mock_value)` when the criterion is mocked.
    pub fn mock_value(&self, criterion: Criterion) -> Option<f64> {
        let (mock, value) = match criterion {
            Criterion::Prevalence => (self.prevalence.mock, self.prevalence.mock_value),
            Criterion::Socioeconomic => (self.socioeconomic.mock, self.socioeconomic.mock_value),
            Criterion::OrphaDrugs => (self.orpha_drugs.mock, self.orpha_drugs.mock_value),
            Criterion::ClinicalTrials => {
                (self.clinical_trials.mock, self.clinical_trials.mock_value)
            }
            Criterion::OrphaGene => (self.orpha_gene.mock, self.orpha_gene.mock_value),
            Criterion::Groups => (self.groups.mock, self.groups.mock_value),
        };
        mock.then_some(value)
    }

    /// Raw configured mock value, whether or not mocking is enabled.
    pub fn configured_mock_value(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Prevalence => self.prevalence.mock_value,
            Criterion::Socioeconomic => self.socioeconomic.mock_value,
            Criterion::OrphaDrugs => self.orpha_drugs.mock_value,
            Criterion::ClinicalTrials => self.clinical_trials.mock_value,
            Criterion::OrphaGene => self.orpha_gene.mock_value,
            Criterion::Groups => self.groups.mock_value,
        }
    }

    pub fn weight_sum(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}
