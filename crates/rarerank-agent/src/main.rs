//! rarerank — Rare-disease research-funding prioritization.
//! Entry point for the CLI binary.

use std::process::ExitCode;

use clap::Parser;
use rarerank_agent::cli::Cli;
use rarerank_agent::run::run;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialise structured logging; RUST_LOG wins over --verbose
    let default_filter = if cli.verbose {
        "rarerank=debug,info"
    } else {
        "rarerank=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("rarerank {}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(summary) => {
            if let Some(reports) = summary.reports {
                println!(
                    "{} diseases ranked, {} failed. Report: {}",
                    summary.ranked,
                    summary.failed,
                    reports.full_csv.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
