//! Public types for the starcat API and pipeline.

use chrono::NaiveDateTime;
use std::path::PathBuf;

/// A galaxy row. Owns zero or more [`Star`]s; `ugc_number` is the external key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Galaxy {
    pub id: i64,
    pub name: String,
    /// Unique, immutable after creation (enforced by the schema).
    pub ugc_number: String,
    pub created_at: NaiveDateTime,
}

/// A star row. `galaxy_id` always resolves to an existing [`Galaxy`] (foreign key).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Star {
    pub id: i64,
    pub galaxy_id: i64,
    pub name: String,
    pub gaia_catalogue_id: String,
    pub created_at: NaiveDateTime,
}

/// Full options (CLI). Built from defaults, then `starcat.toml`, then env, then flags.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// SQLite database file. When None, uses the package default in the working directory.
    pub db_path: Option<PathBuf>,
    /// Worker pool size. When None, uses available parallelism.
    pub max_workers: Option<usize>,
    /// Connection pool size. When None, `max_workers + 1`.
    pub pool_size: Option<usize>,
    /// Append log lines to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Clear and seed the demo catalogue before running.
    pub seed: bool,
    /// Debug-level logging for this crate.
    pub verbose: bool,
}
