//! Spanish justification text per criterion.
//!
//! Texts are rebuilt from the same lookups the scorers perform, never from
//! the numeric score.

use rarerank_config::{
    CriterionConfig, DrugScoring, DrugSource, GeneScoring, GroupScoring, MissingDataPolicy,
    PrevalenceScoring, SocioeconomicScoring, TrialScoring, TrialSource,
};

use rarerank_common::Result;

use crate::provider::{
    DrugProvider, GeneProvider, GroupProvider, PrevalenceProvider, SocioeconomicProvider,
    TrialProvider,
};
use crate::scorer::{fetch_component_drugs, fetch_trials};

/// Trial ids listed in the text before truncating.
const MAX_LISTED_TRIALS: usize = 5;

fn mocked(mock_value: f64) -> String {
    format!("Valor simulado ({mock_value:.1}); criterio pendiente de datos reales.")
}

fn plural<'a>(n: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}

fn missing_data_suffix(policy: MissingDataPolicy) -> &'static str {
    match policy {
        MissingDataPolicy::ZeroScore => "",
        MissingDataPolicy::MockValue => " Se aplica el valor por defecto configurado.",
    }
}

fn drug_source_label(source: DrugSource) -> &'static str {
    match source {
        DrugSource::EuTradenameDrugs => "Medicamentos huérfanos comercializados en la UE",
        DrugSource::MedicalProductsEu => "Productos medicinales autorizados en la UE",
    }
}

fn drug_source_noun(source: DrugSource) -> &'static str {
    match source {
        DrugSource::EuTradenameDrugs => "medicamentos huérfanos comercializados en la UE",
        DrugSource::MedicalProductsEu => "productos medicinales autorizados en la UE",
    }
}

fn trial_source_label(source: TrialSource) -> &'static str {
    match source {
        TrialSource::SpanishTrials => "en España",
        TrialSource::EuTrials => "en la UE",
        TrialSource::AllTrials => "a nivel mundial",
    }
}

pub fn justify_prevalence(
    orpha_code: &str,
    config: &CriterionConfig<PrevalenceScoring>,
    provider: &dyn PrevalenceProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let policy = config.scoring.handle_missing_data;
    Ok(match provider.prevalence_class(orpha_code)? {
        Some(class) if config.scoring.class_mapping.contains_key(&class) => {
            format!("Prevalencia según Orphanet: {class}.")
        }
        Some(class) => format!(
            "Prevalencia según Orphanet: {class}, clase sin puntuación configurada.{}",
            missing_data_suffix(policy)
        ),
        None => format!(
            "Sin datos de prevalencia en Orphanet.{}",
            missing_data_suffix(policy)
        ),
    })
}

pub fn justify_socioeconomic(
    orpha_code: &str,
    config: &CriterionConfig<SocioeconomicScoring>,
    provider: &dyn SocioeconomicProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let policy = config.scoring.handle_missing_data;
    let Some(level) = provider.evidence_level(orpha_code)? else {
        return Ok(format!(
            "No se ha encontrado evidencia publicada sobre el impacto socioeconómico.{}",
            missing_data_suffix(policy)
        ));
    };

    let mut text = if config.scoring.evidence_mappings.contains_key(&level) {
        format!("Nivel de evidencia: {level}.")
    } else {
        format!(
            "Nivel de evidencia: {level}, sin puntuación configurada.{}",
            missing_data_suffix(policy)
        )
    };
    if let Some(detail) = provider.justification(orpha_code)? {
        text.push(' ');
        text.push_str(&detail);
    }
    Ok(text)
}

pub fn justify_orpha_drugs(
    orpha_code: &str,
    config: &CriterionConfig<DrugScoring>,
    provider: &dyn DrugProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let components = fetch_component_drugs(orpha_code, &config.scoring, provider)?;
    if components.iter().all(|c| c.drug_ids.is_empty()) {
        let sources: Vec<&str> = components
            .iter()
            .map(|c| drug_source_noun(c.component.source))
            .collect();
        return Ok(if sources.is_empty() {
            "Sin fuentes de medicamentos configuradas.".to_string()
        } else {
            format!("Sin {}: necesidad terapéutica no cubierta.", sources.join(" ni "))
        });
    }

    let parts: Vec<String> = components
        .iter()
        .map(|c| {
            let label = drug_source_label(c.component.source);
            if c.drug_ids.is_empty() {
                format!("{label}: ninguno.")
            } else {
                let names: Vec<String> =
                    c.drug_ids.iter().map(|id| provider.drug_name(id)).collect();
                format!("{label} ({}): {}.", c.drug_ids.len(), names.join(", "))
            }
        })
        .collect();
    Ok(parts.join(" "))
}

pub fn justify_clinical_trials(
    orpha_code: &str,
    config: &CriterionConfig<TrialScoring>,
    provider: &dyn TrialProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let lookup = fetch_trials(orpha_code, &config.scoring, provider)?;
    let n = lookup.count();
    let counted = if n == 0 {
        format!("Sin ensayos clínicos {}.", trial_source_label(lookup.source))
    } else {
        let mut listed: Vec<&str> = lookup
            .trial_ids
            .iter()
            .take(MAX_LISTED_TRIALS)
            .map(String::as_str)
            .collect();
        if n > MAX_LISTED_TRIALS {
            listed.push("...");
        }
        format!(
            "{n} {} {} ({}).",
            plural(n, "ensayo clínico", "ensayos clínicos"),
            trial_source_label(lookup.source),
            listed.join(", ")
        )
    };

    if lookup.used_fallback() {
        Ok(format!(
            "Sin ensayos clínicos {}; se consulta la fuente alternativa. {counted}",
            trial_source_label(lookup.preferred)
        ))
    } else {
        Ok(counted)
    }
}

pub fn justify_orpha_gene(
    orpha_code: &str,
    config: &CriterionConfig<GeneScoring>,
    provider: &dyn GeneProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let genes = provider.genes_for_disease(orpha_code)?;
    Ok(match genes.as_slice() {
        [] => "Sin genes causales conocidos; no es candidata a terapia génica dirigida.".to_string(),
        [gene] => format!(
            "Enfermedad monogénica (gen {gene}); candidata a terapia génica dirigida."
        ),
        many => format!(
            "Asociada a {} genes ({}); no es candidata a terapia génica sobre un único gen.",
            many.len(),
            many.join(", ")
        ),
    })
}

pub fn justify_groups(
    orpha_code: &str,
    config: &CriterionConfig<GroupScoring>,
    provider: &dyn GroupProvider,
) -> Result<String> {
    if config.mock {
        return Ok(mocked(config.mock_value));
    }
    let groups = provider.groups_for_disease(orpha_code)?;
    if groups.is_empty() {
        return Ok("No se han identificado grupos de investigación activos.".to_string());
    }
    let n = groups.len();
    Ok(format!(
        "{n} {}: {}.",
        plural(n, "grupo de investigación activo", "grupos de investigación activos"),
        groups.join(", ")
    ))
}
