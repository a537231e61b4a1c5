//! Batch scoring and ranking.

use std::cmp::Ordering;

use rarerank_common::{DiseaseIdentity, DiseaseScore, Result};
use rarerank_config::PrioritizationConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::provider::ReferenceData;
use crate::scorer::CriteriaScorer;
use crate::weights::WeightVector;

/// A disease excluded from the ranking because its scoring failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringFailure {
    pub orpha_code: String,
    pub disease_name: String,
    pub error: String,
}

/// Result of one batch run: ranked successes plus the excluded diseases.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Sorted by descending weighted score; `rank` is `1..=ranked.len()`.
    pub ranked: Vec<DiseaseScore>,
    pub failures: Vec<ScoringFailure>,
}

impl BatchOutcome {
    pub fn top(&self, n: usize) -> &[DiseaseScore] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

#[derive(Debug, Clone)]
pub struct BatchRanker {
    scorer: CriteriaScorer,
    weights: WeightVector,
    parallel_threshold: usize,
}

impl BatchRanker {
    /// Weights are read from the configuration once, here.
    pub fn new(data: ReferenceData, config: &PrioritizationConfig) -> Self {
        let weights = WeightVector::from_config(&config.criteria);
        Self {
            scorer: CriteriaScorer::new(data, config.criteria.clone()),
            weights,
            parallel_threshold: config.execution.parallel_threshold,
        }
    }

    /// Batches larger than `threshold` are scored on the rayon pool.
    /// 0 means always sequential.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Score a single disease: six criteria, six justifications and the
    /// weighted index. Unranked.
    pub fn score_disease(&self, disease: &DiseaseIdentity) -> Result<DiseaseScore> {
        let code = disease.orpha_code.as_str();
        let scores = self.scorer.score(code)?;
        let justifications = self.scorer.justify(code)?;
        let weighted = self.weights.weighted_score(&scores);
        debug!(
            orpha_code = code,
            weighted_score = weighted,
            scores = ?scores.as_array(),
            "Disease scored"
        );
        Ok(DiseaseScore::new(disease, scores, justifications, weighted))
    }

    /// Score every disease and rank the successes. A disease whose scoring
    /// fails is logged and moved to `failures`; the batch carries on.
    pub fn rank(&self, diseases: &[DiseaseIdentity]) -> Result<BatchOutcome> {
        info!(diseases = diseases.len(), "Scoring batch");

        let mut scored = Vec::with_capacity(diseases.len());
        let mut failures = Vec::new();
        for (disease, result) in self.score_all(diseases) {
            match result {
                Ok(score) => scored.push(score),
                Err(e) => {
                    error!(
                        orpha_code = %disease.orpha_code,
                        disease = %disease.disease_name,
                        error = %e,
                        "Failed to score disease, excluding it from the ranking"
                    );
                    failures.push(ScoringFailure {
                        orpha_code: disease.orpha_code.clone(),
                        disease_name: disease.disease_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let ranked = rank_scores(scored)?;
        info!(
            ranked = ranked.len(),
            failed = failures.len(),
            "Batch ranking complete"
        );
        Ok(BatchOutcome { ranked, failures })
    }

    fn score_all<'a>(
        &self,
        diseases: &'a [DiseaseIdentity],
    ) -> Vec<(&'a DiseaseIdentity, Result<DiseaseScore>)> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel_threshold > 0 && diseases.len() > self.parallel_threshold {
                use rayon::prelude::*;
                debug!(threshold = self.parallel_threshold, "Scoring in parallel");
                return diseases
                    .par_iter()
                    .map(|d| (d, self.score_disease(d)))
                    .collect();
            }
        }
        diseases.iter().map(|d| (d, self.score_disease(d))).collect()
    }
}

/// Sort by weighted score (highest first) and assign dense ranks from 1.
pub fn rank_scores(mut scores: Vec<DiseaseScore>) -> Result<Vec<DiseaseScore>> {
    scores.sort_by(compare_for_ranking);
    for (position, score) in scores.iter_mut().enumerate() {
        score.assign_rank(position as u32 + 1)?;
    }
    Ok(scores)
}

/// Descending weighted score; ties broken by ORPHA code ascending.
fn compare_for_ranking(a: &DiseaseScore, b: &DiseaseScore) -> Ordering {
    b.weighted_score()
        .total_cmp(&a.weighted_score())
        .then_with(|| compare_orpha_codes(&a.orpha_code, &b.orpha_code))
}

/// Numeric codes first, by value; then the rest lexically. The raw text
/// settles codes of equal value such as "558" and "0558".
fn compare_orpha_codes(a: &str, b: &str) -> Ordering {
    orpha_sort_key(a).cmp(&orpha_sort_key(b))
}

fn orpha_sort_key(code: &str) -> (bool, Option<u64>, &str) {
    let numeric = code.parse::<u64>().ok();
    (numeric.is_none(), numeric, code)
}
