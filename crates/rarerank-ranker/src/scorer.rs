//! Per-criterion scoring.
//!
//! Each scorer maps one disease's reference data onto [0, 10]. A mocked
//! criterion returns its configured `mock_value` without touching the data.
//! The `fetch_*` helpers are shared with the justification generators so the
//! text always describes exactly what was counted.

use std::collections::BTreeMap;

use rarerank_common::{CriteriaScore, Criterion, Justifications, Result, MAX_SCORE};
use rarerank_config::{
    CriteriaConfig, CriterionConfig, DrugComponent, DrugScoring, GeneScoring, GroupScoring,
    MissingDataPolicy, PrevalenceScoring, SocioeconomicScoring, TrialScoring, TrialSource,
};
use tracing::warn;

use crate::justification;
use crate::normalise::{reverse_winsorized_min_max_scaling, winsorized_min_max_scaling};
use crate::provider::{
    DrugProvider, GeneProvider, GroupProvider, PrevalenceProvider, ReferenceData,
    SocioeconomicProvider, TrialProvider,
};

// ── Shared lookups ──────────────────────────────────────────────────────────

/// Drugs counted for one configured component.
#[derive(Debug, Clone)]
pub struct ComponentDrugs<'a> {
    pub component: &'a DrugComponent,
    pub drug_ids: Vec<String>,
}

pub fn fetch_component_drugs<'a>(
    orpha_code: &str,
    scoring: &'a DrugScoring,
    provider: &dyn DrugProvider,
) -> Result<Vec<ComponentDrugs<'a>>> {
    scoring
        .components
        .iter()
        .map(|component| {
            Ok(ComponentDrugs {
                component,
                drug_ids: provider.drugs_from(orpha_code, component.source)?,
            })
        })
        .collect()
}

/// Outcome of the trial lookup, including whether the fallback was used.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialLookup {
    pub preferred: TrialSource,
    /// Source the trial ids were taken from.
    pub source: TrialSource,
    pub trial_ids: Vec<String>,
}

impl TrialLookup {
    pub fn used_fallback(&self) -> bool {
        self.source != self.preferred
    }

    pub fn count(&self) -> usize {
        self.trial_ids.len()
    }
}

/// Count from the preferred source; only an exact zero triggers the fallback.
pub fn fetch_trials(
    orpha_code: &str,
    scoring: &TrialScoring,
    provider: &dyn TrialProvider,
) -> Result<TrialLookup> {
    let preferred = scoring.source_preference;
    let trial_ids = provider.trials_from(orpha_code, preferred)?;
    if trial_ids.is_empty() {
        if let Some(fallback) = scoring.fallback.filter(|f| *f != preferred) {
            return Ok(TrialLookup {
                preferred,
                source: fallback,
                trial_ids: provider.trials_from(orpha_code, fallback)?,
            });
        }
    }
    Ok(TrialLookup {
        preferred,
        source: preferred,
        trial_ids,
    })
}

// ── Scorers ─────────────────────────────────────────────────────────────────

fn missing_data_score(policy: MissingDataPolicy, mock_value: f64) -> f64 {
    match policy {
        MissingDataPolicy::ZeroScore => 0.0,
        MissingDataPolicy::MockValue => mock_value,
    }
}

fn score_from_mapping(
    criterion: Criterion,
    orpha_code: &str,
    label: Option<String>,
    mapping: &BTreeMap<String, f64>,
    policy: MissingDataPolicy,
    mock_value: f64,
) -> f64 {
    let Some(label) = label else {
        return missing_data_score(policy, mock_value);
    };
    match mapping.get(&label) {
        Some(score) => *score,
        None => {
            warn!(
                orpha_code,
                %criterion,
                label = %label,
                "Label has no configured score, treating as missing data"
            );
            missing_data_score(policy, mock_value)
        }
    }
}

pub fn score_prevalence(
    orpha_code: &str,
    config: &CriterionConfig<PrevalenceScoring>,
    provider: &dyn PrevalenceProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    Ok(score_from_mapping(
        Criterion::Prevalence,
        orpha_code,
        provider.prevalence_class(orpha_code)?,
        &config.scoring.class_mapping,
        config.scoring.handle_missing_data,
        config.mock_value,
    ))
}

pub fn score_socioeconomic(
    orpha_code: &str,
    config: &CriterionConfig<SocioeconomicScoring>,
    provider: &dyn SocioeconomicProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    Ok(score_from_mapping(
        Criterion::Socioeconomic,
        orpha_code,
        provider.evidence_level(orpha_code)?,
        &config.scoring.evidence_mappings,
        config.scoring.handle_missing_data,
        config.mock_value,
    ))
}

/// Fewer approved drugs means higher unmet need.
pub fn score_orpha_drugs(
    orpha_code: &str,
    config: &CriterionConfig<DrugScoring>,
    provider: &dyn DrugProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    let total: f64 = fetch_component_drugs(orpha_code, &config.scoring, provider)?
        .iter()
        .map(|c| {
            let count = c.drug_ids.len() as f64;
            reverse_winsorized_min_max_scaling(count, c.component.max, c.component.scale_factor)
                * c.component.weight
        })
        .sum();
    Ok(total.min(MAX_SCORE))
}

pub fn score_clinical_trials(
    orpha_code: &str,
    config: &CriterionConfig<TrialScoring>,
    provider: &dyn TrialProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    let lookup = fetch_trials(orpha_code, &config.scoring, provider)?;
    Ok(winsorized_min_max_scaling(
        lookup.count() as f64,
        config.scoring.max,
        config.scoring.scale_factor,
    ))
}

/// Monogenic diseases are the tractable gene-therapy targets: exactly one
/// gene scores 10, none or several score 0.
pub fn score_orpha_gene(
    orpha_code: &str,
    config: &CriterionConfig<GeneScoring>,
    provider: &dyn GeneProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    let genes = provider.genes_for_disease(orpha_code)?;
    Ok(if genes.len() == 1 { MAX_SCORE } else { 0.0 })
}

pub fn score_groups(
    orpha_code: &str,
    config: &CriterionConfig<GroupScoring>,
    provider: &dyn GroupProvider,
) -> Result<f64> {
    if config.mock {
        return Ok(config.mock_value);
    }
    let groups = provider.groups_for_disease(orpha_code)?;
    Ok(winsorized_min_max_scaling(
        groups.len() as f64,
        config.scoring.max,
        config.scoring.scale_factor,
    ))
}

// ── All six ─────────────────────────────────────────────────────────────────

/// Runs the six scorers and justification generators for one disease.
#[derive(Debug, Clone)]
pub struct CriteriaScorer {
    data: ReferenceData,
    criteria: CriteriaConfig,
}

impl CriteriaScorer {
    pub fn new(data: ReferenceData, criteria: CriteriaConfig) -> Self {
        Self { data, criteria }
    }

    pub fn criteria(&self) -> &CriteriaConfig {
        &self.criteria
    }

    pub fn score(&self, orpha_code: &str) -> Result<CriteriaScore> {
        let c = &self.criteria;
        let d = &self.data;
        CriteriaScore::new(
            score_prevalence(orpha_code, &c.prevalence, d.prevalence.as_ref())?,
            score_socioeconomic(orpha_code, &c.socioeconomic, d.socioeconomic.as_ref())?,
            score_orpha_drugs(orpha_code, &c.orpha_drugs, d.drugs.as_ref())?,
            score_clinical_trials(orpha_code, &c.clinical_trials, d.trials.as_ref())?,
            score_orpha_gene(orpha_code, &c.orpha_gene, d.genes.as_ref())?,
            score_groups(orpha_code, &c.groups, d.groups.as_ref())?,
        )
    }

    pub fn justify(&self, orpha_code: &str) -> Result<Justifications> {
        let c = &self.criteria;
        let d = &self.data;
        Ok(Justifications {
            prevalence: justification::justify_prevalence(
                orpha_code,
                &c.prevalence,
                d.prevalence.as_ref(),
            )?,
            socioeconomic: justification::justify_socioeconomic(
                orpha_code,
                &c.socioeconomic,
                d.socioeconomic.as_ref(),
            )?,
            orpha_drugs: justification::justify_orpha_drugs(
                orpha_code,
                &c.orpha_drugs,
                d.drugs.as_ref(),
            )?,
            clinical_trials: justification::justify_clinical_trials(
                orpha_code,
                &c.clinical_trials,
                d.trials.as_ref(),
            )?,
            orpha_gene: justification::justify_orpha_gene(
                orpha_code,
                &c.orpha_gene,
                d.genes.as_ref(),
            )?,
            groups: justification::justify_groups(orpha_code, &c.groups, d.groups.as_ref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_provider::MockDiseaseData;
    use rarerank_config::DrugSource;

    fn criterion_config<S>(scoring: S) -> CriterionConfig<S> {
        CriterionConfig {
            weight: 0.2,
            mock: false,
            mock_value: 0.0,
            scoring,
        }
    }

    fn prevalence_cfg(policy: MissingDataPolicy) -> CriterionConfig<PrevalenceScoring> {
        let mut config = criterion_config(PrevalenceScoring {
            class_mapping: BTreeMap::from([
                ("<1 / 1 000 000".to_string(), 10.0),
                ("1-9 / 100 000".to_string(), 6.0),
            ]),
            handle_missing_data: policy,
        });
        config.mock_value = 4.0;
        config
    }

    fn drug_cfg() -> CriterionConfig<DrugScoring> {
        criterion_config(DrugScoring {
            components: vec![
                DrugComponent {
                    source: DrugSource::EuTradenameDrugs,
                    weight: 0.8,
                    max: 10.0,
                    scale_factor: 10.0,
                },
                DrugComponent {
                    source: DrugSource::MedicalProductsEu,
                    weight: 0.2,
                    max: 20.0,
                    scale_factor: 10.0,
                },
            ],
        })
    }

    fn trial_cfg(fallback: Option<TrialSource>) -> CriterionConfig<TrialScoring> {
        criterion_config(TrialScoring {
            source_preference: TrialSource::SpanishTrials,
            fallback,
            max: 100.0,
            scale_factor: 10.0,
        })
    }

    #[test]
    fn test_mock_bypasses_data() {
        let data = MockDiseaseData::new().with_malformed("558", Criterion::Groups);
        let mut config = criterion_config(GroupScoring::default());
        config.mock = true;
        config.mock_value = 7.5;
        assert_eq!(score_groups("558", &config, &data).unwrap(), 7.5);
    }

    #[test]
    fn test_prevalence_mapping() {
        let data = MockDiseaseData::new().with_prevalence("558", "1-9 / 100 000");
        let config = prevalence_cfg(MissingDataPolicy::ZeroScore);
        assert_eq!(score_prevalence("558", &config, &data).unwrap(), 6.0);
    }

    #[test]
    fn test_prevalence_missing_data_policies() {
        let data = MockDiseaseData::new().with_prevalence("166", "Unknown class");
        let zero = prevalence_cfg(MissingDataPolicy::ZeroScore);
        let mock = prevalence_cfg(MissingDataPolicy::MockValue);
        assert_eq!(score_prevalence("404", &zero, &data).unwrap(), 0.0);
        assert_eq!(score_prevalence("404", &mock, &data).unwrap(), 4.0);
        // Unmapped labels count as missing.
        assert_eq!(score_prevalence("166", &zero, &data).unwrap(), 0.0);
        assert_eq!(score_prevalence("166", &mock, &data).unwrap(), 4.0);
    }

    #[test]
    fn test_socioeconomic_mapping() {
        let data = MockDiseaseData::new().with_evidence("558", "High evidence", None);
        let config = criterion_config(SocioeconomicScoring {
            evidence_mappings: BTreeMap::from([("High evidence".to_string(), 10.0)]),
            handle_missing_data: MissingDataPolicy::ZeroScore,
        });
        assert_eq!(score_socioeconomic("558", &config, &data).unwrap(), 10.0);
        assert_eq!(score_socioeconomic("166", &config, &data).unwrap(), 0.0);
    }

    #[test]
    fn test_no_drugs_scores_maximum() {
        let data = MockDiseaseData::new();
        let score = score_orpha_drugs("558", &drug_cfg(), &data).unwrap();
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_saturated_tradename_component_contributes_nothing() {
        let ids: Vec<String> = (0..10).map(|i| format!("D{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let data = MockDiseaseData::new().with_eu_tradename_drugs("558", &refs);
        let score = score_orpha_drugs("558", &drug_cfg(), &data).unwrap();
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_drug_sum_is_capped() {
        let mut config = drug_cfg();
        config.scoring.components[1].weight = 0.8;
        let score = score_orpha_drugs("558", &config, &MockDiseaseData::new()).unwrap();
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_trial_fallback_only_on_zero() {
        let config = trial_cfg(Some(TrialSource::EuTrials));

        let fallback = MockDiseaseData::new().with_eu_trials("558", 5);
        let lookup = fetch_trials("558", &config.scoring, &fallback).unwrap();
        assert!(lookup.used_fallback());
        assert!((score_clinical_trials("558", &config, &fallback).unwrap() - 0.5).abs() < 1e-9);

        let preferred = MockDiseaseData::new()
            .with_spanish_trials("558", 2)
            .with_eu_trials("558", 40);
        let lookup = fetch_trials("558", &config.scoring, &preferred).unwrap();
        assert!(!lookup.used_fallback());
        // Spanish trials are EU trials too, but only the preferred count is used.
        assert_eq!(lookup.count(), 2);
        assert!((score_clinical_trials("558", &config, &preferred).unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_trials_without_fallback() {
        let config = trial_cfg(None);
        let data = MockDiseaseData::new().with_eu_trials("558", 5);
        assert_eq!(score_clinical_trials("558", &config, &data).unwrap(), 0.0);
    }

    #[test]
    fn test_gene_score_is_binary_on_exactly_one() {
        let data = MockDiseaseData::new()
            .with_genes("1", &["FBN1"])
            .with_genes("2", &["BRCA1", "BRCA2"]);
        let config = criterion_config(GeneScoring::default());
        assert_eq!(score_orpha_gene("1", &config, &data).unwrap(), 10.0);
        assert_eq!(score_orpha_gene("2", &config, &data).unwrap(), 0.0);
        assert_eq!(score_orpha_gene("3", &config, &data).unwrap(), 0.0);
    }

    #[test]
    fn test_groups_winsorized() {
        let data = MockDiseaseData::new()
            .with_groups("1", &["U1"])
            .with_groups("2", &["U1", "U2", "U3", "U4"]);
        let config = criterion_config(GroupScoring::default());
        let one = score_groups("1", &config, &data).unwrap();
        assert!((one - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(score_groups("2", &config, &data).unwrap(), 10.0);
    }

    #[test]
    fn test_malformed_record_propagates() {
        let data = MockDiseaseData::new().with_malformed("558", Criterion::OrphaGene);
        let config = criterion_config(GeneScoring::default());
        assert!(score_orpha_gene("558", &config, &data).is_err());
    }
}
