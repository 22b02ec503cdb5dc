//! Pipeline context and tuning: shared handles passed into every worker thread.

use std::sync::Arc;

use crate::engine::db_ops::Store;
use crate::utils::config::{PoolConsts, WorkerThreadLimits};

use super::events::{EventSink, RecordStar, StarProcessor};

/// Worker pool size, resolved once per pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub max_workers: usize,
}

impl PipelineTuning {
    /// The galaxy scan holds one connection for the whole run, so star streams need another.
    pub const MIN_POOL_SIZE: usize = PoolConsts::EXTRA_CONNECTIONS + 1;

    /// `requested` workers, or available parallelism; never fewer than one.
    pub fn new(requested: Option<usize>) -> Self {
        Self {
            max_workers: WorkerThreadLimits::current().resolve(requested),
        }
    }

    /// Connections needed so no stream waits on the pool: one per worker plus the galaxy scan.
    pub fn pool_size(&self) -> usize {
        self.max_workers + PoolConsts::EXTRA_CONNECTIONS
    }

    /// `requested` pool size, or [`Self::pool_size`]; never below [`Self::MIN_POOL_SIZE`].
    pub fn resolve_pool_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or_else(|| self.pool_size())
            .max(Self::MIN_POOL_SIZE)
    }
}

/// Everything a worker needs. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct WorkerContext {
    pub store: Arc<dyn Store>,
    pub sink: Arc<dyn EventSink>,
    pub processor: Arc<dyn StarProcessor>,
}

impl WorkerContext {
    /// Context with the default action ([`RecordStar`]) writing to `sink`.
    pub fn new(store: Arc<dyn Store>, sink: Arc<dyn EventSink>) -> Self {
        let processor: Arc<dyn StarProcessor> = Arc::new(RecordStar::new(Arc::clone(&sink)));
        Self {
            store,
            sink,
            processor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_covers_workers_and_galaxy_scan() {
        let tuning = PipelineTuning::new(Some(4));
        assert_eq!(tuning.max_workers, 4);
        assert_eq!(tuning.pool_size(), 5);
    }

    #[test]
    fn pool_size_defaults_to_workers_plus_scan() {
        let tuning = PipelineTuning::new(Some(3));
        assert_eq!(tuning.resolve_pool_size(None), 4);
        assert_eq!(tuning.resolve_pool_size(Some(2)), 2);
    }

    #[test]
    fn pool_size_never_starves_star_streams() {
        let tuning = PipelineTuning::new(Some(1));
        assert_eq!(tuning.resolve_pool_size(Some(0)), PipelineTuning::MIN_POOL_SIZE);
        assert_eq!(tuning.resolve_pool_size(Some(1)), 2);
    }

    #[test]
    fn zero_workers_becomes_one() {
        assert_eq!(PipelineTuning::new(Some(0)).max_workers, 1);
    }
}
