//! Galaxy stream: every galaxy over a rendezvous channel, plus a one-slot error channel.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::Galaxy;
use crate::engine::db_ops::{Store, StoreError};
use crate::utils::config::StreamChannelCap;

/// Send every galaxy on `galaxy_tx`. A query or decode failure stops the scan and is sent on
/// `error_tx` (the only send it ever gets). Both senders are owned here, so both channels close
/// exactly once when this returns. Returns the number of galaxies received by consumers.
pub fn stream_galaxies(
    store: &dyn Store,
    galaxy_tx: Sender<Galaxy>,
    error_tx: Sender<StoreError>,
) -> usize {
    let mut sent = 0_usize;
    let scanned = store.scan_galaxies(&mut |galaxy| {
        let delivered = galaxy_tx.send(galaxy).is_ok();
        sent += usize::from(delivered);
        delivered
    });
    if let Err(e) = scanned {
        debug!("galaxy stream: stopped on error after {} galaxies: {}", sent, e);
        let _ = error_tx.send(e);
    } else {
        debug!("galaxy stream: {} galaxies sent", sent);
    }
    sent
}

/// Handles returned by [`spawn_galaxy_stream`]. Drain `galaxy_rx`, then `error_rx`, then join.
pub struct GalaxyStreamHandles {
    pub galaxy_rx: Receiver<Galaxy>,
    pub error_rx: Receiver<StoreError>,
    pub handle: JoinHandle<usize>,
}

/// Run [`stream_galaxies`] on its own thread. It must not run inline: sends block until a
/// consumer receives.
pub fn spawn_galaxy_stream(store: Arc<dyn Store>) -> GalaxyStreamHandles {
    let (galaxy_tx, galaxy_rx) = bounded::<Galaxy>(StreamChannelCap::DATA);
    let (error_tx, error_rx) = bounded::<StoreError>(StreamChannelCap::ERROR);
    let handle = thread::spawn(move || stream_galaxies(store.as_ref(), galaxy_tx, error_tx));
    GalaxyStreamHandles {
        galaxy_rx,
        error_rx,
        handle,
    }
}
