//! Eager semantic validation of a parsed configuration.

use rarerank_common::{Criterion, RareRankError, Result, MAX_SCORE, MIN_SCORE};

use crate::{MissingDataPolicy, PrioritizationConfig};

/// Weight sums further than this from 1.0 are reported (never rejected).
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

impl PrioritizationConfig {
    /// Check every numeric parameter the scorers rely on. All problems are
    /// reported together in a single `Config` error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let criteria = &self.criteria;

        for criterion in Criterion::ALL {
            let weight = criteria.weight(criterion);
            if !weight.is_finite() || weight < 0.0 {
                problems.push(format!("criteria.{criterion}.weight must be a finite value >= 0 (got {weight})"));
            }
            let mock_value = criteria.configured_mock_value(criterion);
            if !in_score_range(mock_value) {
                problems.push(format!(
                    "criteria.{criterion}.mock_value must be within [0, 10] (got {mock_value})"
                ));
            }
        }

        let prevalence = &criteria.prevalence;
        if !prevalence.mock && prevalence.scoring.class_mapping.is_empty() {
            problems.push("criteria.prevalence.scoring.class_mapping must not be empty".to_string());
        }
        for (label, score) in &prevalence.scoring.class_mapping {
            if !in_score_range(*score) {
                problems.push(format!(
                    "criteria.prevalence.scoring.class_mapping['{label}'] must be within [0, 10] (got {score})"
                ));
            }
        }

        let socioeconomic = &criteria.socioeconomic;
        if !socioeconomic.mock && socioeconomic.scoring.evidence_mappings.is_empty() {
            problems.push(
                "criteria.socioeconomic.scoring.evidence_mappings must not be empty".to_string(),
            );
        }
        for (label, score) in &socioeconomic.scoring.evidence_mappings {
            if !in_score_range(*score) {
                problems.push(format!(
                    "criteria.socioeconomic.scoring.evidence_mappings['{label}'] must be within [0, 10] (got {score})"
                ));
            }
        }

        let drugs = &criteria.orpha_drugs;
        if !drugs.mock && drugs.scoring.components.is_empty() {
            problems.push("criteria.orpha_drugs.scoring.components must not be empty".to_string());
        }
        for (i, component) in drugs.scoring.components.iter().enumerate() {
            let prefix = format!("criteria.orpha_drugs.scoring.components[{i}]");
            if !component.weight.is_finite() || component.weight < 0.0 {
                problems.push(format!("{prefix}.weight must be a finite value >= 0"));
            }
            check_positive(&mut problems, &format!("{prefix}.max"), component.max);
            check_positive(&mut problems, &format!("{prefix}.scale_factor"), component.scale_factor);
        }

        let trials = &criteria.clinical_trials.scoring;
        check_positive(&mut problems, "criteria.clinical_trials.scoring.max", trials.max);
        check_positive(
            &mut problems,
            "criteria.clinical_trials.scoring.scale_factor",
            trials.scale_factor,
        );
        if trials.fallback == Some(trials.source_preference) {
            tracing::warn!(
                source = ?trials.source_preference,
                "clinical_trials fallback equals the preferred source; fallback has no effect"
            );
        }

        let groups = &criteria.groups.scoring;
        check_positive(&mut problems, "criteria.groups.scoring.max", groups.max);
        check_positive(&mut problems, "criteria.groups.scoring.scale_factor", groups.scale_factor);

        // Uncapped scorers: the scale factor is the score ceiling.
        for (field, value) in [
            ("criteria.clinical_trials.scoring.scale_factor", trials.scale_factor),
            ("criteria.groups.scoring.scale_factor", groups.scale_factor),
        ] {
            if value > MAX_SCORE {
                problems.push(format!("{field} must not exceed 10 (got {value})"));
            }
        }

        if self.output.top_n == 0 {
            problems.push("output.top_n must be greater than 0".to_string());
        }
        if self.output.filename.trim().is_empty() {
            problems.push("output.filename must not be empty".to_string());
        }

        if !problems.is_empty() {
            return Err(RareRankError::Config(problems.join("; ")));
        }

        let sum = criteria.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            tracing::warn!(weight_sum = sum, "criteria weights do not sum to 1.0");
        }
        for (criterion, policy) in [
            (Criterion::Prevalence, prevalence.scoring.handle_missing_data),
            (Criterion::Socioeconomic, socioeconomic.scoring.handle_missing_data),
        ] {
            if policy == MissingDataPolicy::MockValue {
                tracing::debug!(%criterion, "missing data falls back to the configured mock value");
            }
        }

        Ok(())
    }
}

fn in_score_range(value: f64) -> bool {
    value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value)
}

fn check_positive(problems: &mut Vec<String>, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        problems.push(format!("{field} must be greater than 0 (got {value})"));
    }
}
