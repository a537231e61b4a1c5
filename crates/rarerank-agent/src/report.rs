//! Report artifacts for a ranked batch.
//!
//! Every file is written to a temporary file in the target directory and then
//! renamed over the destination, so readers never see a partial report.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rarerank_common::{Criterion, DiseaseScore, RareRankError, Result};
use rarerank_config::OutputConfig;
use rarerank_ranker::{BatchOutcome, ScoringFailure};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

/// Column holding the weighted index.
pub const FINAL_INDEX_COLUMN: &str = "indice_final";

/// Paths of the artifacts written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub full_csv: PathBuf,
    pub top_csv: PathBuf,
    pub top_json: Option<PathBuf>,
    pub failures_json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TopEntry<'a> {
    disease_name: &'a str,
    orpha_code: &'a str,
}

#[derive(Debug, Serialize)]
struct FailureReport<'a> {
    generated_at: DateTime<Utc>,
    failed: usize,
    failures: &'a [ScoringFailure],
}

pub fn write_reports(outcome: &BatchOutcome, output: &OutputConfig) -> Result<ReportPaths> {
    let dir = output.base_path.as_path();
    std::fs::create_dir_all(dir)?;
    let stem = output.filename.as_str();
    let top = outcome.top(output.top_n);

    let full_csv = dir.join(format!("{stem}.csv"));
    write_csv(&full_csv, &outcome.ranked)?;

    let top_csv = dir.join(format!("{stem}_top{}.csv", output.top_n));
    write_csv(&top_csv, top)?;

    let top_json = if output.output_final_top_n {
        let path = dir.join(format!("{stem}_top{}.json", output.top_n));
        let entries: Vec<TopEntry<'_>> = top
            .iter()
            .map(|s| TopEntry {
                disease_name: &s.disease_name,
                orpha_code: &s.orpha_code,
            })
            .collect();
        write_json(&path, &entries)?;
        Some(path)
    } else {
        None
    };

    let failures_json = if outcome.failures.is_empty() {
        None
    } else {
        let path = dir.join(format!("{stem}_failures.json"));
        write_json(
            &path,
            &FailureReport {
                generated_at: Utc::now(),
                failed: outcome.failures.len(),
                failures: &outcome.failures,
            },
        )?;
        Some(path)
    };

    info!(
        dir = %dir.display(),
        ranked = outcome.ranked.len(),
        top_n = top.len(),
        "Reports written"
    );
    Ok(ReportPaths {
        full_csv,
        top_csv,
        top_json,
        failures_json,
    })
}

/// rank, orpha_code, disease_name, a score/justification pair per criterion,
/// then the weighted index.
pub fn csv_header() -> Vec<String> {
    let mut header = vec![
        "rank".to_string(),
        "orpha_code".to_string(),
        "disease_name".to_string(),
    ];
    for criterion in Criterion::ALL {
        header.push(format!("puntuacion_{}", criterion.key()));
        header.push(format!("justificacion_{}", criterion.key()));
    }
    header.push(FINAL_INDEX_COLUMN.to_string());
    header
}

fn csv_row(score: &DiseaseScore) -> Vec<String> {
    let mut row = vec![
        score.rank().map(|r| r.to_string()).unwrap_or_default(),
        score.orpha_code.clone(),
        score.disease_name.clone(),
    ];
    for criterion in Criterion::ALL {
        row.push(format!("{:.4}", score.criteria_scores().get(criterion)));
        row.push(score.justifications.get(criterion).to_string());
    }
    row.push(format!("{:.4}", score.weighted_score()));
    row
}

fn write_csv(path: &Path, scores: &[DiseaseScore]) -> Result<()> {
    persist_atomically(path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(csv_header()).map_err(export_error)?;
        for score in scores {
            writer.write_record(csv_row(score)).map_err(export_error)?;
        }
        writer.flush()?;
        Ok(())
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    persist_atomically(path, |file| {
        serde_json::to_writer_pretty(&mut *file, value)?;
        file.write_all(b"\n")?;
        Ok(())
    })
}

fn persist_atomically(
    path: &Path,
    write: impl FnOnce(&mut NamedTempFile) -> Result<()>,
) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    write(&mut file)?;
    file.as_file().sync_all()?;
    file.persist(path)
        .map_err(|e| RareRankError::Export(format!("{}: {}", path.display(), e.error)))?;
    Ok(())
}

fn export_error(err: csv::Error) -> RareRankError {
    RareRankError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rarerank_common::{CriteriaScore, DiseaseIdentity, Justifications};
    use rarerank_ranker::ranker::rank_scores;

    fn outcome() -> BatchOutcome {
        let scores = [
            ("558", "Síndrome de Marfan", 5.5),
            ("586", "Fibrosis quística", 5.875),
            ("166", "Ataxia de Friedreich", 5.715),
        ]
        .iter()
        .map(|(code, name, weighted)| {
            let mut justifications = Justifications::default();
            justifications.orpha_gene = format!("Gen, con coma ({code})");
            DiseaseScore::new(
                &DiseaseIdentity::new(*code, *name),
                CriteriaScore::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
                justifications,
                *weighted,
            )
        })
        .collect();
        BatchOutcome {
            ranked: rank_scores(scores).unwrap(),
            failures: vec![ScoringFailure {
                orpha_code: "999".to_string(),
                disease_name: "Rota".to_string(),
                error: "Malformed genes record".to_string(),
            }],
        }
    }

    fn output_config(dir: &Path, top_n: usize) -> OutputConfig {
        OutputConfig {
            base_path: dir.join("out"),
            filename: "ranking".to_string(),
            top_n,
            output_final_top_n: true,
        }
    }

    #[test]
    fn test_header_layout() {
        let header = csv_header();
        assert_eq!(header.len(), 3 + 12 + 1);
        assert_eq!(header[3], "puntuacion_prevalence");
        assert_eq!(header[4], "justificacion_prevalence");
        assert_eq!(header.last().map(String::as_str), Some(FINAL_INDEX_COLUMN));
    }

    #[test]
    fn test_write_reports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_reports(&outcome(), &output_config(dir.path(), 2)).unwrap();

        let mut reader = csv::Reader::from_path(&paths.full_csv).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "586");
        assert_eq!(&rows[0][12], "Gen, con coma (586)");
        assert_eq!(&rows[0][15], "5.8750");

        let top_rows = csv::Reader::from_path(&paths.top_csv).unwrap().records().count();
        assert_eq!(top_rows, 2);
        assert!(paths.top_csv.ends_with("ranking_top2.csv"));

        let top: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.top_json.unwrap()).unwrap()).unwrap();
        assert_eq!(
            top,
            serde_json::json!([
                {"disease_name": "Fibrosis quística", "orpha_code": "586"},
                {"disease_name": "Ataxia de Friedreich", "orpha_code": "166"}
            ])
        );

        let failures: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(paths.failures_json.unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(failures["failed"], 1);
        assert_eq!(failures["failures"][0]["orpha_code"], "999");
    }

    #[test]
    fn test_top_n_larger_than_population_and_no_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut outcome = outcome();
        outcome.failures.clear();
        let mut output = output_config(dir.path(), 50);
        output.output_final_top_n = false;

        let paths = write_reports(&outcome, &output).unwrap();
        assert_eq!(csv::Reader::from_path(&paths.top_csv).unwrap().records().count(), 3);
        assert_eq!(paths.top_json, None);
        assert_eq!(paths.failures_json, None);
        assert!(!dir.path().join("out/ranking_failures.json").exists());
    }

    #[test]
    fn test_rewrite_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_config(dir.path(), 1);
        std::fs::create_dir_all(&output.base_path).unwrap();
        std::fs::write(output.base_path.join("ranking.csv"), "stale").unwrap();

        let paths = write_reports(&outcome(), &output).unwrap();
        let content = std::fs::read_to_string(paths.full_csv).unwrap();
        assert!(content.starts_with("rank,orpha_code,disease_name"));
    }
}
