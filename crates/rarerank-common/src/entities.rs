//! Core entity types shared by the scoring engine, the data store and the reports.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RareRankError, Result};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Disease identity
// ---------------------------------------------------------------------------

/// One disease in a prioritization run. Orphanet codes arrive either as JSON
/// strings or numbers in the curated lists; both are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiseaseIdentity {
    #[serde(deserialize_with = "orpha_code_from_any")]
    pub orpha_code: String,
    pub disease_name: String,
}

impl DiseaseIdentity {
    pub fn new(orpha_code: impl Into<String>, disease_name: impl Into<String>) -> Self {
        Self {
            orpha_code: orpha_code.into(),
            disease_name: disease_name.into(),
        }
    }
}

fn orpha_code_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(u64),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Text(code) => code.trim().to_string(),
        RawCode::Number(code) => code.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The six fixed prioritization criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Prevalence,
    Socioeconomic,
    OrphaDrugs,
    ClinicalTrials,
    OrphaGene,
    Groups,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Prevalence,
        Criterion::Socioeconomic,
        Criterion::OrphaDrugs,
        Criterion::ClinicalTrials,
        Criterion::OrphaGene,
        Criterion::Groups,
    ];

    /// Configuration / column key.
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Prevalence => "prevalence",
            Criterion::Socioeconomic => "socioeconomic",
            Criterion::OrphaDrugs => "orpha_drugs",
            Criterion::ClinicalTrials => "clinical_trials",
            Criterion::OrphaGene => "orpha_gene",
            Criterion::Groups => "groups",
        }
    }

    /// Human-readable label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Prevalence => "Prevalencia",
            Criterion::Socioeconomic => "Impacto socioeconómico",
            Criterion::OrphaDrugs => "Medicamentos huérfanos",
            Criterion::ClinicalTrials => "Ensayos clínicos",
            Criterion::OrphaGene => "Terapia génica",
            Criterion::Groups => "Grupos de investigación",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Six per-criterion scores, each in [0, 10]. Only constructible through
/// [`CriteriaScore::new`], which enforces the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriteriaScore {
    prevalence: f64,
    socioeconomic: f64,
    orpha_drugs: f64,
    clinical_trials: f64,
    orpha_gene: f64,
    groups: f64,
}

impl CriteriaScore {
    pub fn new(
        prevalence: f64,
        socioeconomic: f64,
        orpha_drugs: f64,
        clinical_trials: f64,
        orpha_gene: f64,
        groups: f64,
    ) -> Result<Self> {
        let score = Self {
            prevalence,
            socioeconomic,
            orpha_drugs,
            clinical_trials,
            orpha_gene,
            groups,
        };
        for (criterion, value) in score.iter() {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(RareRankError::InvalidScore { criterion, value });
            }
        }
        Ok(score)
    }

    /// Build from an array ordered as [`Criterion::ALL`].
    pub fn from_array(values: [f64; 6]) -> Result<Self> {
        let [p, s, d, t, g, r] = values;
        Self::new(p, s, d, t, g, r)
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

    pub fn as_array(&self) -> [f64; 6] {
        Criterion::ALL.map(|c| self.get(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Justification text per criterion, produced alongside the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Justifications {
    pub prevalence: String,
    pub socioeconomic: String,
    pub orpha_drugs: String,
    pub clinical_trials: String,
    pub orpha_gene: String,
    pub groups: String,
}

impl Justifications {
    pub fn get(&self, criterion: Criterion) -> &str {
        match criterion {
            Criterion::Prevalence => &self.prevalence,
            Criterion::Socioeconomic => &self.socioeconomic,
            Criterion::OrphaDrugs => &self.orpha_drugs,
            Criterion::ClinicalTrials => &self.clinical_trials,
            Criterion::OrphaGene => &self.orpha_gene,
            Criterion::Groups => &self.groups,
        }
    }
}

/// Final per-disease result. `rank` stays `None` until the batch ranker has
/// sorted the whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseScore {
    pub orpha_code: String,
    pub disease_name: String,
    criteria_scores: CriteriaScore,
    pub justifications: Justifications,
    weighted_score: f64,
    rank: Option<u32>,
}

impl DiseaseScore {
    pub fn new(
        disease: &DiseaseIdentity,
        criteria_scores: CriteriaScore,
        justifications: Justifications,
        weighted_score: f64,
    ) -> Self {
        Self {
            orpha_code: disease.orpha_code.clone(),
            disease_name: disease.disease_name.clone(),
            criteria_scores,
            justifications,
            weighted_score,
            rank: None,
        }
    }

    pub fn criteria_scores(&self) -> &CriteriaScore {
        &self.criteria_scores
    }

    pub fn weighted_score(&self) -> f64 {
        self.weighted_score
    }

    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// Set the rank. A rank can be assigned only once.
    pub fn assign_rank(&mut self, rank: u32) -> Result<()> {
        if let Some(existing) = self.rank {
            return Err(RareRankError::Other(anyhow::anyhow!(
                "ORPHA:{} already ranked at position {existing}",
                self.orpha_code
            )));
        }
        self.rank = Some(rank);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
