//! Load `starcat.toml` (CLI only). Lib callers build [`Opts`] themselves.
//! `starcat.example.toml` at the repo root lists every key.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StarcatToml {
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    pipeline: PipelineSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseSection {
    path: Option<String>,
    pool_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineSection {
    max_workers: Option<usize>,
    seed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    file: Option<String>,
    verbose: Option<bool>,
}

/// Look for the config file in `start`, then in its parent (so tests run from a
/// subdirectory still find the project config).
pub(crate) fn find_config_file(start: &Path) -> Option<PathBuf> {
    let name = PackagePaths::get().config_filename();
    start
        .ancestors()
        .take(2)
        .map(|dir| dir.join(name))
        .find(|p| p.is_file())
}

/// Parse a config file. A file that exists but does not parse is an error.
pub(crate) fn load_starcat_toml(path: &Path) -> Result<StarcatToml> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_starcat_toml(&s).with_context(|| format!("parse config {}", path.display()))
}

fn parse_starcat_toml(s: &str) -> Result<StarcatToml> {
    Ok(toml::from_str(s)?)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident => Some $opts_field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$opts_field = Some(v);
        }
    };
    ($section:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub(crate) fn apply_file_to_opts(file: &StarcatToml, opts: &mut Opts) {
    if let Some(ref p) = file.database.path {
        opts.db_path = Some(PathBuf::from(p));
    }
    apply_file_opt!(file.database, opts, pool_size => Some pool_size);
    apply_file_opt!(file.pipeline, opts, max_workers => Some max_workers);
    apply_file_opt!(file.pipeline, opts, seed => seed);
    if let Some(ref p) = file.logging.file {
        opts.log_file = Some(PathBuf::from(p));
    }
    apply_file_opt!(file.logging, opts, verbose => verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let file = parse_starcat_toml(
            r#"
            [database]
            path = "catalog.db"
            pool_size = 6

            [pipeline]
            max_workers = 4
            seed = false

            [logging]
            file = "star-catalog.log"
            verbose = true
            "#,
        )
        .unwrap();
        let mut opts = Opts {
            seed: true,
            ..Default::default()
        };
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.db_path, Some(PathBuf::from("catalog.db")));
        assert_eq!(opts.pool_size, Some(6));
        assert_eq!(opts.max_workers, Some(4));
        assert!(!opts.seed);
        assert_eq!(opts.log_file, Some(PathBuf::from("star-catalog.log")));
        assert!(opts.verbose);
    }

    #[test]
    fn missing_fields_leave_opts_alone() {
        let file = parse_starcat_toml("[pipeline]\nmax_workers = 2\n").unwrap();
        let mut opts = Opts {
            db_path: Some(PathBuf::from("keep.db")),
            seed: true,
            ..Default::default()
        };
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.db_path, Some(PathBuf::from("keep.db")));
        assert_eq!(opts.max_workers, Some(2));
        assert!(opts.seed);
    }

    #[test]
    fn example_config_logs_to_star_catalog_log() {
        let file = parse_starcat_toml(include_str!("../../starcat.example.toml")).unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.log_file, Some(PathBuf::from("star-catalog.log")));
        assert_eq!(opts.db_path, Some(PathBuf::from("starcat.db")));
        assert!(opts.seed);
        assert_eq!(opts.pool_size, None);
    }

    #[test]
    fn unknown_key_is_an_error() {
        assert!(parse_starcat_toml("[database]\ndbuser = \"root\"\n").is_err());
    }
}
