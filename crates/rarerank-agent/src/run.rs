//! One prioritization run: load, score, rank, export.

use anyhow::Context;
use rarerank_config::PrioritizationConfig;
use rarerank_data::load_disease_list;
use rarerank_ranker::curated_provider::CuratedDataAdapter;
use rarerank_ranker::BatchRanker;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::plan::render_plan;
use crate::report::{write_reports, ReportPaths};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ranked: usize,
    pub failed: usize,
    /// `None` for a dry run.
    pub reports: Option<ReportPaths>,
}

pub fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let mut config = PrioritizationConfig::load(&cli.config)
        .with_context(|| format!("Could not load configuration {}", cli.config.display()))?;
    config.apply_overrides(cli.output.clone(), cli.top_n)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    if cli.dry_run {
        print!("{}", render_plan(&config));
        return Ok(RunSummary {
            ranked: 0,
            failed: 0,
            reports: None,
        });
    }

    let diseases = load_disease_list(&config.input.data_source).with_context(|| {
        format!(
            "Could not read disease list {}",
            config.input.data_source.display()
        )
    })?;
    let adapter = CuratedDataAdapter::open(&config.data.base_path).with_context(|| {
        format!(
            "Could not load curated data from {}",
            config.data.base_path.display()
        )
    })?;
    for table in adapter.store().missing_tables() {
        warn!(table, "Curated table absent; affected criteria score as missing data");
    }

    let ranker = BatchRanker::new(adapter.into_reference_data(), &config);
    let outcome = ranker.rank(&diseases)?;
    let reports = write_reports(&outcome, &config.output).context("Could not write reports")?;

    info!(
        ranked = outcome.ranked.len(),
        failed = outcome.failures.len(),
        report = %reports.full_csv.display(),
        "Prioritization complete"
    );
    Ok(RunSummary {
        ranked: outcome.ranked.len(),
        failed: outcome.failures.len(),
        reports: Some(reports),
    })
}
