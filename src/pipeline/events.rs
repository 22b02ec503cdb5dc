//! Pipeline output: events, the sinks that receive them, and the per-star action.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::{Galaxy, Star};

/// One record emitted by the pipeline. `Display` gives the log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A worker picked up a galaxy.
    ProcessingGalaxy { ugc_number: String },
    /// The default action ran for one star.
    StarProcessed { star: String, galaxy: String },
    /// A galaxy's star stream closed; `count` stars were processed.
    GalaxySummary { count: usize, galaxy: String },
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEvent::ProcessingGalaxy { ugc_number } => {
                write!(f, "Processing {} galaxy", ugc_number)
            }
            CatalogEvent::StarProcessed { star, galaxy } => {
                write!(f, "Star: {}, Galaxy: {}", star, galaxy)
            }
            CatalogEvent::GalaxySummary { count, galaxy } => {
                write!(f, "{} stars processed for galaxy {}", count, galaxy)
            }
        }
    }
}

/// Where events go. Shared by every worker, so it must be thread-safe.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CatalogEvent);
}

/// Writes each event as an info line through the `log` facade (timestamped by the logger).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: CatalogEvent) {
        log::info!("{}", event);
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<CatalogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Rendered lines, sorted: compare as a multiset since workers interleave.
    pub fn sorted_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.events().iter().map(ToString::to_string).collect();
        lines.sort();
        lines
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: CatalogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// The action run once per star, synchronously on the worker that owns the galaxy.
pub trait StarProcessor: Send + Sync {
    fn process(&self, galaxy: &Galaxy, star: &Star);
}

impl<F> StarProcessor for F
where
    F: Fn(&Galaxy, &Star) + Send + Sync,
{
    fn process(&self, galaxy: &Galaxy, star: &Star) {
        self(galaxy, star)
    }
}

/// Default action: emit [`CatalogEvent::StarProcessed`] to the sink.
pub struct RecordStar {
    sink: Arc<dyn EventSink>,
}

impl RecordStar {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl StarProcessor for RecordStar {
    fn process(&self, galaxy: &Galaxy, star: &Star) {
        self.sink.emit(CatalogEvent::StarProcessed {
            star: star.name.clone(),
            galaxy: galaxy.name.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn epoch() -> NaiveDateTime {
        chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    #[test]
    fn lines_render_like_the_log() {
        let processing = CatalogEvent::ProcessingGalaxy {
            ugc_number: "ugc_number1".into(),
        };
        let star = CatalogEvent::StarProcessed {
            star: "Sun".into(),
            galaxy: "Milky Way".into(),
        };
        let summary = CatalogEvent::GalaxySummary {
            count: 2,
            galaxy: "Milky Way".into(),
        };
        assert_eq!(processing.to_string(), "Processing ugc_number1 galaxy");
        assert_eq!(star.to_string(), "Star: Sun, Galaxy: Milky Way");
        assert_eq!(summary.to_string(), "2 stars processed for galaxy Milky Way");
    }

    #[test]
    fn record_star_emits_one_event() {
        let sink = Arc::new(MemorySink::new());
        let processor = RecordStar::new(sink.clone());
        let galaxy = Galaxy {
            id: 1,
            name: "Milky Way".into(),
            ugc_number: "ugc_number1".into(),
            created_at: epoch(),
        };
        let star = Star {
            id: 7,
            galaxy_id: 1,
            name: "Sun".into(),
            gaia_catalogue_id: "gaia_catalogue_id1".into(),
            created_at: epoch(),
        };
        processor.process(&galaxy, &star);
        assert_eq!(
            sink.events(),
            vec![CatalogEvent::StarProcessed {
                star: "Sun".into(),
                galaxy: "Milky Way".into(),
            }]
        );
    }

    #[test]
    fn closures_are_processors() {
        let seen = Mutex::new(Vec::new());
        let processor = |_: &Galaxy, s: &Star| seen.lock().unwrap().push(s.id);
        let galaxy = Galaxy {
            id: 1,
            name: "g".into(),
            ugc_number: "u".into(),
            created_at: epoch(),
        };
        let star = Star {
            id: 3,
            galaxy_id: 1,
            name: "s".into(),
            gaia_catalogue_id: "c".into(),
            created_at: epoch(),
        };
        StarProcessor::process(&processor, &galaxy, &star);
        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }
}
