use clap::Parser;
use std::path::PathBuf;

/// Concurrent star catalogue pipeline.
#[derive(Clone, Debug, Parser)]
#[command(name = "starcat")]
#[command(
    about = "Process every star of every galaxy in the catalogue, galaxies in parallel."
)]
pub struct Cli {
    /// SQLite catalogue file. Default: `starcat.db` in the working directory.
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Config file. Default: `starcat.toml` in the working directory or its parent.
    #[arg(long, short = 'C')]
    pub config: Option<PathBuf>,

    /// Max galaxies processed at once. Default: available parallelism.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Connection pool size. Default: workers + 1. Minimum 2.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub pool_size: Option<usize>,

    /// Append log lines to this file instead of stderr.
    #[arg(long, short = 'o')]
    pub log_file: Option<PathBuf>,

    /// Keep the existing catalogue: do not clear it and seed the demo galaxies.
    #[arg(long)]
    pub no_seed: bool,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
