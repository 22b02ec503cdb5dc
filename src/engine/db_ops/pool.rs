//! Bounded pool of SQLite connections to one database file.
//!
//! Idle connections sit on a crossbeam channel used as a free list. A [`PooledConnection`]
//! goes back to the list when dropped, so a cursor held through a connection is released on
//! every exit path of the code holding it.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::debug;
use rusqlite::Connection;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::utils::config::PoolConsts;

use super::{CONNECTION_PRAGMAS, SCHEMA, StoreError, WAL_PRAGMAS};

pub struct ConnectionPool {
    path: PathBuf,
    max_size: usize,
    opened: AtomicUsize,
    idle_tx: Sender<Connection>,
    idle_rx: Receiver<Connection>,
}

/// Open one connection with busy timeout and per-connection pragmas.
fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let connect_err = |source: rusqlite::Error| StoreError::Connect {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open(path).map_err(connect_err)?;
    conn.busy_timeout(PoolConsts::BUSY_TIMEOUT)
        .map_err(connect_err)?;
    conn.execute_batch(CONNECTION_PRAGMAS).map_err(connect_err)?;
    Ok(conn)
}

/// Enable WAL (persistent in the file) and apply schema (idempotent).
fn apply_wal_and_schema(conn: &Connection, path: &Path) -> Result<(), StoreError> {
    let connect_err = |source: rusqlite::Error| StoreError::Connect {
        path: path.to_path_buf(),
        source,
    };
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(connect_err)?;
    conn.execute_batch(WAL_PRAGMAS).map_err(connect_err)?;
    conn.execute_batch(SCHEMA).map_err(connect_err)?;
    Ok(())
}

impl ConnectionPool {
    /// Open the database at `path` (created if missing), apply schema, and keep up to
    /// `max_size` connections. Fails with [`StoreError::Connect`] when the file cannot be opened.
    pub fn open(path: &Path, max_size: usize) -> Result<Self, StoreError> {
        let max_size = max_size.max(1);
        let (idle_tx, idle_rx) = bounded(max_size);
        let first = open_connection(path)?;
        apply_wal_and_schema(&first, path)?;
        idle_tx
            .try_send(first)
            .map_err(|_| StoreError::Other("connection pool free list rejected first connection".into()))?;
        debug!("Opened {} (pool size {})", path.display(), max_size);
        Ok(Self {
            path: path.to_path_buf(),
            max_size,
            opened: AtomicUsize::new(1),
            idle_tx,
            idle_rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of connections opened so far (idle or checked out).
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Acquire)
    }

    /// Check out a connection: an idle one, else a new one while under `max_size`, else wait
    /// up to [`PoolConsts::ACQUIRE_TIMEOUT`] for one to be returned.
    pub fn get(&self) -> Result<PooledConnection<'_>, StoreError> {
        if let Ok(conn) = self.idle_rx.try_recv() {
            return Ok(PooledConnection::new(self, conn));
        }
        let reserved = self
            .opened
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_size).then_some(n + 1)
            })
            .is_ok();
        if reserved {
            return match open_connection(&self.path) {
                Ok(conn) => Ok(PooledConnection::new(self, conn)),
                Err(e) => {
                    self.opened.fetch_sub(1, Ordering::AcqRel);
                    Err(e)
                }
            };
        }
        self.idle_rx
            .recv_timeout(PoolConsts::ACQUIRE_TIMEOUT)
            .map(|conn| PooledConnection::new(self, conn))
            .map_err(|_| StoreError::PoolTimeout(PoolConsts::ACQUIRE_TIMEOUT))
    }
}

/// A checked-out connection; returned to the pool on drop.
pub struct PooledConnection<'a> {
    pool: &'a ConnectionPool,
    conn: Option<Connection>,
}

impl<'a> PooledConnection<'a> {
    fn new(pool: &'a ConnectionPool, conn: Connection) -> Self {
        Self {
            pool,
            conn: Some(conn),
        }
    }
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
            .as_ref()
            .expect("pooled connection is present until drop")
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            // Never full: at most max_size connections exist.
            let _ = self.pool.idle_tx.try_send(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_returned_connections() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("pool.db"), 3).unwrap();
        {
            let _a = pool.get().unwrap();
        }
        {
            let _b = pool.get().unwrap();
        }
        assert_eq!(pool.opened(), 1);
    }

    #[test]
    fn opens_up_to_max_size() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("pool.db"), 2).unwrap();
        let a = pool.get().unwrap();
        let b = pool.get().unwrap();
        assert_eq!(pool.opened(), 2);
        drop(a);
        let _c = pool.get().unwrap();
        assert_eq!(pool.opened(), 2);
        drop(b);
    }

    #[test]
    fn zero_size_is_clamped_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("pool.db"), 0).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn unreachable_path_is_a_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dir").join("pool.db");
        match ConnectionPool::open(&path, 1) {
            Err(StoreError::Connect { .. }) => {}
            other => panic!("expected Connect error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn foreign_keys_enabled_on_every_connection() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("pool.db"), 2).unwrap();
        let a = pool.get().unwrap();
        let b = pool.get().unwrap();
        for conn in [&a, &b] {
            let on: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
                .unwrap();
            assert_eq!(on, 1);
        }
    }
}
