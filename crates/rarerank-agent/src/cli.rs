use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "rarerank",
    version,
    about = "Rank rare diseases for research-funding prioritization"
)]
pub struct Cli {
    /// Configuration file (.yaml, .yml, .json or .toml)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Output directory, overrides output.base_path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Number of diseases in the top-N artifacts, overrides output.top_n
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Validate the configuration and print the run plan without scoring
    #[arg(long)]
    pub dry_run: bool,
}
