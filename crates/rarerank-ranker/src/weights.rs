//! Weight vector for disease prioritization scoring.

use rarerank_common::{CriteriaScore, Criterion};
use rarerank_config::CriteriaConfig;
use serde::{Deserialize, Serialize};

/// The 6-component weight vector W, read once per run from configuration.
/// Weights are expected to sum to ~1.0 but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub prevalence: f64,
    pub socioeconomic: f64,
    pub orpha_drugs: f64,
    pub clinical_trials: f64,
    pub orpha_gene: f64,
    pub groups: f64,
}

impl WeightVector {
    pub fn from_config(criteria: &CriteriaConfig) -> Self {
        Self {
            prevalence: criteria.weight(Criterion::Prevalence),
            socioeconomic: criteria.weight(Criterion::Socioeconomic),
            orpha_drugs: criteria.weight(Criterion::OrphaDrugs),
            clinical_trials: criteria.weight(Criterion::ClinicalTrials),
            orpha_gene: criteria.weight(Criterion::OrphaGene),
            groups: criteria.weight(Criterion::Groups),
        }
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Prevalence => self.prevalence,
            Criterion::Socioeconomic => self.socioeconomic,
            Criterion::OrphaDrugs => self.orpha_drugs,
            Criterion::ClinicalTrials => self.clinical_trials,
            Criterion::OrphaGene => self.orpha_gene,
            Criterion::Groups => self.groups,
        }
    }

    /// Convert to array for iteration, ordered as [`Criterion::ALL`].
    pub fn as_array(&self) -> [f64; 6] {
        Criterion::ALL.map(|c| self.get(c))
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Whether the weights sum to ~1.0.
    pub fn is_normalised(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    /// weighted_score = Σ score_c × w_c
    pub fn weighted_score(&self, scores: &CriteriaScore) -> f64 {
        scores
            .as_array()
            .iter()
            .zip(self.as_array().iter())
            .map(|(s, w)| s * w)
            .sum()
    }
}
