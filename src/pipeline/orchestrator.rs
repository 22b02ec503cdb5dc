use log::{debug, info};
use std::sync::Arc;

use crate::Galaxy;
use crate::engine::db_ops::{Store, StoreError};

use super::context::{PipelineTuning, WorkerContext};
use super::error_handler::{PipelineError, RunReport, UnitError, check_for_stream_or_unit_errors};
use super::events::{EventSink, StarProcessor};
use super::galaxy_stream::{GalaxyStreamHandles, spawn_galaxy_stream};
use super::worker::{self, spawn_galaxy_workers};

/// Galaxy stream → bounded worker pool (one star stream per galaxy) → aggregated errors.
///
/// The galaxy scan keeps one store connection for the whole run, so a pooled store needs at
/// least [`PipelineTuning::MIN_POOL_SIZE`] (2) connections; with only one, every star stream
/// times out waiting.
///
/// ```ignore
/// let store: Arc<dyn Store> = Arc::new(SqliteStore::open(path, tuning.pool_size())?);
/// let report = Pipeline::new(store, Arc::new(LogSink)).with_max_workers(4).run()?;
/// ```
pub struct Pipeline {
    ctx: WorkerContext,
    tuning: PipelineTuning,
}

impl Pipeline {
    /// Pipeline over `store` emitting to `sink`, with the default per-star action and one
    /// worker per available thread.
    pub fn new(store: Arc<dyn Store>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            ctx: WorkerContext::new(store, sink),
            tuning: PipelineTuning::new(None),
        }
    }

    /// Replace the per-star action.
    pub fn with_processor(mut self, processor: Arc<dyn StarProcessor>) -> Self {
        self.ctx.processor = processor;
        self
    }

    /// Cap concurrent galaxies at `max_workers` (at least one).
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.tuning = PipelineTuning::new(Some(max_workers));
        self
    }

    pub fn tuning(&self) -> PipelineTuning {
        self.tuning
    }

    /// Run once over the whole catalogue. Every galaxy is processed even when others fail; all
    /// errors (galaxy stream and per galaxy) are logged and returned together.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        debug!("Pipeline: {} workers", self.tuning.max_workers);

        // Launch: producer on its own thread (rendezvous sends would block inline).
        let GalaxyStreamHandles {
            galaxy_rx,
            error_rx,
            handle,
        } = spawn_galaxy_stream(Arc::clone(&self.ctx.store));

        // Fan out.
        let worker_handles = spawn_galaxy_workers(galaxy_rx, &self.ctx, self.tuning.max_workers);

        // Join every worker before looking at the galaxy stream's error.
        let mut report = RunReport::default();
        let mut unit_errors = Vec::new();
        for h in worker_handles {
            match h.join() {
                Ok(tally) => {
                    report.galaxies += tally.galaxies;
                    report.stars += tally.stars;
                    unit_errors.extend(tally.errors);
                }
                Err(_) => unit_errors.push(UnitError::WorkerPanicked),
            }
        }

        // Closed by now: the producer returned, which is what ended the workers' loops.
        let mut stream_error = error_rx.iter().next();
        if handle.join().is_err() && stream_error.is_none() {
            stream_error = Some(StoreError::Other("galaxy stream thread panicked".into()));
        }

        info!(
            "Pipeline: {} galaxies, {} stars processed",
            report.galaxies, report.stars
        );
        check_for_stream_or_unit_errors(report, stream_error, unit_errors)
    }

    /// Process a single galaxy on the calling thread (its star stream still gets its own thread).
    pub fn process_galaxy(&self, galaxy: &Galaxy) -> Result<usize, UnitError> {
        worker::process_galaxy(&self.ctx, galaxy)
    }
}
