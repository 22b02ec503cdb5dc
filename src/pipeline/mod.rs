//! Pipeline components: streams, workers, events, error aggregation.

pub mod context;
pub mod error_handler;
pub mod events;
pub mod galaxy_stream;
pub mod orchestrator;
pub mod star_stream;
pub mod worker;

pub use context::{PipelineTuning, WorkerContext};
pub use error_handler::{PipelineError, RunReport, UnitError, check_for_stream_or_unit_errors};
pub use events::{CatalogEvent, EventSink, LogSink, MemorySink, RecordStar, StarProcessor};
pub use galaxy_stream::{GalaxyStreamHandles, spawn_galaxy_stream, stream_galaxies};
pub use orchestrator::Pipeline;
pub use star_stream::{StarStreamHandles, spawn_star_stream, stream_stars};
pub use worker::{WorkerTally, process_galaxy, spawn_galaxy_workers};
