//! `--dry-run` output: what a run would read, weigh and write.

use std::fmt::Write;

use rarerank_common::Criterion;
use rarerank_config::PrioritizationConfig;

pub fn render_plan(config: &PrioritizationConfig) -> String {
    let mut out = String::new();
    let criteria = &config.criteria;
    let output = &config.output;

    let _ = writeln!(out, "Input diseases : {}", config.input.data_source.display());
    let _ = writeln!(out, "Curated data   : {}", config.data.base_path.display());
    let _ = writeln!(out, "Weights:");
    for criterion in Criterion::ALL {
        let mock = match criteria.mock_value(criterion) {
            Some(value) => format!("  [mock = {value:.1}]"),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "  {:<16} {:>6.3}{mock}",
            criterion.key(),
            criteria.weight(criterion)
        );
    }
    let sum = criteria.weight_sum();
    let note = if (sum - 1.0).abs() > 0.01 { "  (does not sum to 1.0)" } else { "" };
    let _ = writeln!(out, "  {:<16} {:>6.3}{note}", "sum", sum);

    let mocked: Vec<&str> = Criterion::ALL
        .iter()
        .filter(|c| criteria.mock_value(**c).is_some())
        .map(|c| c.key())
        .collect();
    let _ = writeln!(
        out,
        "Mocked criteria: {}",
        if mocked.is_empty() { "none".to_string() } else { mocked.join(", ") }
    );

    let dir = output.base_path.display();
    let stem = &output.filename;
    let _ = writeln!(out, "Outputs:");
    let _ = writeln!(out, "  {dir}/{stem}.csv");
    let _ = writeln!(out, "  {dir}/{stem}_top{}.csv", output.top_n);
    if output.output_final_top_n {
        let _ = writeln!(out, "  {dir}/{stem}_top{}.json", output.top_n);
    }
    let _ = writeln!(out, "  {dir}/{stem}_failures.json (only if a disease fails)");
    out
}
