//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    db_filename: String,
    config_filename: String,
    db_path_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                db_filename: format!("{pkg}.db"),
                config_filename: format!("{pkg}.toml"),
                db_path_env_key: format!("{}_DB_PATH", pkg.to_uppercase()),
            }
        })
    }

    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable that overrides the database path (also read from `.env`).
    pub fn db_path_env_key(&self) -> &str {
        &self.db_path_env_key
    }
}

// ---- Worker threads ----

/// Worker pool limits.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Never run fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count to use: the override if given, else all threads; never below the floor.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.all_threads).max(self.floor)
    }
}

// ---- Channels ----

/// Channel capacities for the streams.
pub struct StreamChannelCap;

impl StreamChannelCap {
    /// Rendezvous: the producer blocks until a worker takes the row.
    pub const DATA: usize = 0;
    /// A stream reports at most one terminal error.
    pub const ERROR: usize = 1;
}

// ---- Connection pool ----

pub struct PoolConsts;

impl PoolConsts {
    /// How long a stream waits for a free connection before failing.
    pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
    /// SQLite busy handler timeout per connection.
    pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
    /// Connections beyond the worker count: one for the galaxy scan.
    pub const EXTRA_CONNECTIONS: usize = 1;
}

// ---- Logging ----

/// Timestamp prefix for every log line (e.g. `2024/08/11 15:01:47`).
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_uses_override() {
        let limits = WorkerThreadLimits {
            all_threads: 8,
            ..Default::default()
        };
        assert_eq!(limits.resolve(Some(3)), 3);
        assert_eq!(limits.resolve(None), 8);
    }

    #[test]
    fn resolve_never_below_floor() {
        let limits = WorkerThreadLimits::default();
        assert_eq!(limits.resolve(Some(0)), 1);
        assert_eq!(limits.resolve(None), 1);
    }

    #[test]
    fn package_paths_derive_from_pkg_name() {
        let p = PackagePaths::get();
        assert_eq!(p.db_filename(), "starcat.db");
        assert_eq!(p.config_filename(), "starcat.toml");
        assert_eq!(p.db_path_env_key(), "STARCAT_DB_PATH");
    }
}
