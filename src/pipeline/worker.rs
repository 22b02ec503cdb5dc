use crossbeam_channel::Receiver;
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::Galaxy;

use super::context::WorkerContext;
use super::error_handler::UnitError;
use super::events::CatalogEvent;
use super::star_stream::{StarStreamHandles, spawn_star_stream};

/// What one worker thread did over its lifetime.
#[derive(Debug, Default)]
pub struct WorkerTally {
    pub galaxies: usize,
    pub stars: usize,
    pub errors: Vec<UnitError>,
}

/// Process one galaxy: start its star stream, run the processor on every star, then emit the
/// summary. The stream's terminal result is read only after its channel has closed, so a
/// failure can never slip past the worker. A failure still emits the summary (with the stars
/// processed before it) and is returned as a [`UnitError`].
pub fn process_galaxy(ctx: &WorkerContext, galaxy: &Galaxy) -> Result<usize, UnitError> {
    ctx.sink.emit(CatalogEvent::ProcessingGalaxy {
        ugc_number: galaxy.ugc_number.clone(),
    });

    let StarStreamHandles { star_rx, handle } = spawn_star_stream(Arc::clone(&ctx.store), galaxy.id);
    let mut num_stars = 0_usize;
    for star in star_rx.iter() {
        num_stars += 1;
        ctx.processor.process(galaxy, &star);
    }
    let outcome = handle.join();

    // Identify the galaxy: summaries from different workers interleave.
    ctx.sink.emit(CatalogEvent::GalaxySummary {
        count: num_stars,
        galaxy: galaxy.name.clone(),
    });

    match outcome {
        Ok(Ok(_)) => Ok(num_stars),
        Ok(Err(source)) => Err(UnitError::Stream {
            ugc_number: galaxy.ugc_number.clone(),
            processed: num_stars,
            source,
        }),
        Err(_) => Err(UnitError::StreamPanicked {
            ugc_number: galaxy.ugc_number.clone(),
            processed: num_stars,
        }),
    }
}

/// Single worker: take galaxies from `galaxy_rx` until it closes, processing each fully.
fn galaxy_worker_loop(galaxy_rx: Receiver<Galaxy>, ctx: WorkerContext) -> WorkerTally {
    let mut tally = WorkerTally::default();
    while let Ok(galaxy) = galaxy_rx.recv() {
        tally.galaxies += 1;
        match process_galaxy(&ctx, &galaxy) {
            Ok(n) => tally.stars += n,
            Err(e) => {
                tally.stars += e.processed();
                tally.errors.push(e);
            }
        }
    }
    tally
}

/// Spawn `num_workers` galaxy workers sharing `galaxy_rx`. Galaxies beyond the worker count wait
/// in the producer until a worker is free. `galaxy_rx` is consumed so the only receivers left
/// are the workers' (if they all exit, the producer's sends fail and it stops).
pub fn spawn_galaxy_workers(
    galaxy_rx: Receiver<Galaxy>,
    ctx: &WorkerContext,
    num_workers: usize,
) -> Vec<JoinHandle<WorkerTally>> {
    debug!("Spawning {} galaxy workers", num_workers);
    (0..num_workers)
        .map(|_| {
            let galaxy_rx = galaxy_rx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || galaxy_worker_loop(galaxy_rx, ctx))
        })
        .collect()
}
