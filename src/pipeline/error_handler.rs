//! Error aggregation: unit errors from workers plus the galaxy stream's error, reported once.

use log::error;
use std::fmt;
use thiserror::Error;

use crate::engine::db_ops::StoreError;

/// Counts for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Galaxies picked up by workers.
    pub galaxies: usize,
    /// Stars passed to the processor, over all galaxies (failed ones included).
    pub stars: usize,
}

/// Failure of one unit of work (one galaxy). Never affects sibling units.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("galaxy {ugc_number}: star stream failed after {processed} stars: {source}")]
    Stream {
        ugc_number: String,
        processed: usize,
        source: StoreError,
    },

    #[error("galaxy {ugc_number}: star stream thread panicked after {processed} stars")]
    StreamPanicked { ugc_number: String, processed: usize },

    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl UnitError {
    pub fn ugc_number(&self) -> Option<&str> {
        match self {
            UnitError::Stream { ugc_number, .. } | UnitError::StreamPanicked { ugc_number, .. } => {
                Some(ugc_number)
            }
            UnitError::WorkerPanicked => None,
        }
    }

    /// Stars processed before the failure.
    pub fn processed(&self) -> usize {
        match self {
            UnitError::Stream { processed, .. } | UnitError::StreamPanicked { processed, .. } => {
                *processed
            }
            UnitError::WorkerPanicked => 0,
        }
    }
}

/// A run with at least one error. Carries the partial report; `Display` lists one error per line.
#[derive(Debug)]
pub struct PipelineError {
    pub report: RunReport,
    pub stream_error: Option<StoreError>,
    pub unit_errors: Vec<UnitError>,
}

impl PipelineError {
    /// Every error, galaxy stream first.
    pub fn errors(&self) -> impl Iterator<Item = &(dyn std::error::Error + 'static)> {
        self.stream_error
            .iter()
            .map(|e| e as &(dyn std::error::Error + 'static))
            .chain(
                self.unit_errors
                    .iter()
                    .map(|e| e as &(dyn std::error::Error + 'static)),
            )
    }

    pub fn len(&self) -> usize {
        usize::from(self.stream_error.is_some()) + self.unit_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(e) = &self.stream_error {
            write!(f, "galaxy stream: {}", e)?;
            first = false;
        }
        for e in &self.unit_errors {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for PipelineError {}

/// Call after every worker has been joined and the galaxy error channel drained. Logs each
/// error and returns the report, or a [`PipelineError`] if anything failed.
pub fn check_for_stream_or_unit_errors(
    report: RunReport,
    stream_error: Option<StoreError>,
    unit_errors: Vec<UnitError>,
) -> Result<RunReport, PipelineError> {
    if let Some(e) = &stream_error {
        error!("Pipeline: galaxy stream: {}", e);
    }
    for e in &unit_errors {
        error!("Pipeline: {}", e);
    }
    if stream_error.is_none() && unit_errors.is_empty() {
        return Ok(report);
    }
    Err(PipelineError {
        report,
        stream_error,
        unit_errors,
    })
}
