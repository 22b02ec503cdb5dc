//! Star stream: one galaxy's stars over a rendezvous channel, error as the function result.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::Star;
use crate::engine::db_ops::{Store, StoreError};
use crate::utils::config::StreamChannelCap;

/// Send every star of `galaxy_id` on `star_tx`, then close it (drop) on every exit path.
/// Returns the number of stars the consumer received. Stops early, without error, if the
/// receiver is gone.
pub fn stream_stars(
    store: &dyn Store,
    galaxy_id: i64,
    star_tx: Sender<Star>,
) -> Result<usize, StoreError> {
    store.scan_stars(galaxy_id, &mut |star| star_tx.send(star).is_ok())
}

/// Receiver plus the producer thread; joining the thread yields the stream's terminal result.
pub struct StarStreamHandles {
    pub star_rx: Receiver<Star>,
    pub handle: JoinHandle<Result<usize, StoreError>>,
}

/// Run [`stream_stars`] on its own thread. It must not run inline: sends block until the
/// caller receives.
pub fn spawn_star_stream(store: Arc<dyn Store>, galaxy_id: i64) -> StarStreamHandles {
    let (star_tx, star_rx) = bounded::<Star>(StreamChannelCap::DATA);
    let handle = thread::spawn(move || stream_stars(store.as_ref(), galaxy_id, star_tx));
    StarStreamHandles { star_rx, handle }
}
