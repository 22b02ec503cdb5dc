//! CLI command handler: layer config, set up logging, run the catalogue.

use anyhow::{Context, Result};
use log::debug;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::utils::env::apply_env_to_opts;
use crate::utils::setup_logging;
use crate::utils::starcat_toml::{apply_file_to_opts, find_config_file, load_starcat_toml};

/// Flags win over everything else.
fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(ref db) = cli.db {
        opts.db_path = Some(db.clone());
    }
    if cli.workers.is_some() {
        opts.max_workers = cli.workers;
    }
    if cli.pool_size.is_some() {
        opts.pool_size = cli.pool_size;
    }
    if let Some(ref f) = cli.log_file {
        opts.log_file = Some(f.clone());
    }
    if cli.no_seed {
        opts.seed = false;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
}

/// Defaults → config file → env (`.env`) → flags.
pub fn build_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts {
        seed: true,
        ..Default::default()
    };
    let cwd = std::env::current_dir().context("read current directory")?;
    if let Some(path) = cli.config.clone().or_else(|| find_config_file(&cwd)) {
        let file = load_starcat_toml(&path)?;
        apply_file_to_opts(&file, &mut opts);
    }
    apply_env_to_opts(&cwd, &mut opts);
    apply_cli_to_opts(cli, &mut opts);
    Ok(opts)
}

/// Run the catalogue. Per-galaxy failures are logged and do not fail the command; bootstrap
/// failures (config, logging, opening the store, seeding) do.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = build_opts(cli)?;
    setup_logging(opts.verbose, opts.log_file.as_deref())?;
    debug!("{:#?}", opts);
    crate::run_catalog(&opts)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_opts() {
        let cli = Cli::parse_from([
            "starcat",
            "--db",
            "flag.db",
            "-w",
            "3",
            "--pool-size",
            "9",
            "--no-seed",
            "-v",
        ]);
        let mut opts = Opts {
            db_path: Some(PathBuf::from("file.db")),
            max_workers: Some(8),
            seed: true,
            ..Default::default()
        };
        apply_cli_to_opts(&cli, &mut opts);
        assert_eq!(opts.db_path, Some(PathBuf::from("flag.db")));
        assert_eq!(opts.max_workers, Some(3));
        assert_eq!(opts.pool_size, Some(9));
        assert!(!opts.seed);
        assert!(opts.verbose);
    }

    #[test]
    fn absent_flags_keep_opts() {
        let cli = Cli::parse_from(["starcat"]);
        let mut opts = Opts {
            max_workers: Some(8),
            seed: true,
            verbose: true,
            ..Default::default()
        };
        apply_cli_to_opts(&cli, &mut opts);
        assert_eq!(opts.max_workers, Some(8));
        assert!(opts.seed);
        assert!(opts.verbose);
    }

    #[test]
    fn verbose_accepts_explicit_false() {
        let cli = Cli::parse_from(["starcat", "--verbose", "false"]);
        assert_eq!(cli.verbose, Some(false));
    }

    #[test]
    fn rejects_non_numeric_workers() {
        assert!(Cli::try_parse_from(["starcat", "--workers", "many"]).is_err());
    }
}
