//! Environment overrides: process env first, then `.env` in the working directory.

use log::debug;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn try_env_then_dotenv(dir: &Path, key: &str) -> Option<String> {
    if let Some(s) = non_empty_var(key) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_var(key);
    }
    None
}

/// Apply `STARCAT_DB_PATH` (env → `.env` in `dir`) to opts.
pub(crate) fn apply_env_to_opts(dir: &Path, opts: &mut Opts) {
    let key = PackagePaths::get().db_path_env_key();
    if let Some(path) = try_env_then_dotenv(dir, key) {
        debug!("{} set; using database {}", key, path);
        opts.db_path = Some(PathBuf::from(path));
    }
}
