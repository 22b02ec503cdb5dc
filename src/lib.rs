//! starcat: concurrent star catalogue pipeline over SQLite

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{SqliteStore, Store, StoreError};
pub use pipeline::{
    CatalogEvent, EventSink, LogSink, MemorySink, Pipeline, PipelineError, RunReport,
    StarProcessor,
};

use anyhow::Context;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::PipelineTuning;
use crate::utils::config::PackagePaths;

/// Result alias used by public starcat API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: open the catalogue named by `opts`, optionally clear and seed the demo
/// galaxies, and run the pipeline with [`LogSink`].
///
/// Failing to open or seed the store is an error. Failures inside the run (galaxy stream or
/// single galaxies) are logged by the pipeline and the partial report is returned.
pub fn run_catalog(opts: &Opts) -> Result<RunReport> {
    let tuning = PipelineTuning::new(opts.max_workers);
    let pool_size = tuning.resolve_pool_size(opts.pool_size);
    match opts.pool_size {
        Some(requested) if requested < PipelineTuning::MIN_POOL_SIZE => warn!(
            "Pool size {} leaves no connection for star streams (the galaxy scan holds one); using {}",
            requested, pool_size
        ),
        _ if pool_size < tuning.pool_size() => warn!(
            "Pool size {} is below workers + 1 ({}); workers take turns for star stream connections",
            pool_size,
            tuning.pool_size()
        ),
        _ => {}
    }

    let db_path = opts
        .db_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(PackagePaths::get().db_filename()));
    let store = Arc::new(
        SqliteStore::open(&db_path, pool_size)
            .with_context(|| format!("open catalogue {}", db_path.display()))?,
    );

    if opts.seed {
        store.clear().context("clear catalogue")?;
        store.seed_demo_catalog().context("seed demo catalogue")?;
    }
    debug!(
        "Catalogue {}: {} galaxies, {} stars",
        db_path.display(),
        store.galaxy_count()?,
        store.star_count()?
    );

    let pipeline = Pipeline::new(store, Arc::new(LogSink)).with_max_workers(tuning.max_workers);
    match pipeline.run() {
        Ok(report) => Ok(report),
        Err(e) => {
            warn!("Pipeline finished with {} error(s)", e.len());
            Ok(e.report)
        }
    }
}
