//! The `Store` seam and its SQLite implementation.

use log::debug;
use rusqlite::{Params, Row};
use std::path::Path;

use crate::{Galaxy, Star};

use super::{
    CLEAR_SQL, ConnectionPool, SELECT_GALAXIES_SQL, SELECT_GALAXY_BY_UGC_SQL, SELECT_STARS_SQL,
    StoreError,
};

/// Storage capability injected into every stream and the pipeline.
///
/// Scans hand each decoded row to `sink`; when `sink` returns `false` the consumer has gone
/// away and the scan stops early. Scans return the number of rows accepted by `sink`.
/// Implementations must be safe to query from many threads at once.
pub trait Store: Send + Sync {
    /// Every galaxy, in insertion order.
    fn scan_galaxies(&self, sink: &mut dyn FnMut(Galaxy) -> bool) -> Result<usize, StoreError>;

    /// Every star whose `galaxy_id` is `galaxy_id`, in insertion order.
    fn scan_stars(
        &self,
        galaxy_id: i64,
        sink: &mut dyn FnMut(Star) -> bool,
    ) -> Result<usize, StoreError>;

    /// Point lookup by external key. Unknown keys give [`StoreError::NotFound`].
    fn find_galaxy(&self, ugc_number: &str) -> Result<Galaxy, StoreError>;

    /// Delete every star and galaxy.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Pooled SQLite store. Cheap to share behind an `Arc`.
pub struct SqliteStore {
    pub(super) pool: ConnectionPool,
}

pub(crate) fn galaxy_from_row(row: &Row<'_>) -> rusqlite::Result<Galaxy> {
    Ok(Galaxy {
        id: row.get(0)?,
        name: row.get(1)?,
        ugc_number: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub(crate) fn star_from_row(row: &Row<'_>) -> rusqlite::Result<Star> {
    Ok(Star {
        id: row.get(0)?,
        galaxy_id: row.get(1)?,
        name: row.get(2)?,
        gaia_catalogue_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl SqliteStore {
    /// Open (or create) the catalogue at `path` with up to `pool_size` connections. A pipeline
    /// over this store needs at least two (see [`crate::Pipeline`]).
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, StoreError> {
        Ok(Self {
            pool: ConnectionPool::open(path, pool_size)?,
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run `sql` and feed each decoded row to `sink`. The statement, its cursor and the pooled
    /// connection are all released when this returns, early exits included.
    fn scan_rows<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        table: &'static str,
        decode: fn(&Row<'_>) -> rusqlite::Result<T>,
        sink: &mut dyn FnMut(T) -> bool,
    ) -> Result<usize, StoreError> {
        let query_err = |source: rusqlite::Error| StoreError::Query {
            what: table,
            source,
        };
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare_cached(sql).map_err(query_err)?;
        let mut rows = stmt.query(params).map_err(query_err)?;
        let mut accepted = 0_usize;
        while let Some(row) = rows.next().map_err(query_err)? {
            let value = decode(row).map_err(|source| StoreError::Decode { table, source })?;
            if !sink(value) {
                debug!("{} consumer gone after {} rows; stopping scan", table, accepted);
                break;
            }
            accepted += 1;
        }
        Ok(accepted)
    }

    fn count(&self, table: &'static str) -> Result<usize, StoreError> {
        let conn = self.pool.get()?;
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .map_err(|source| StoreError::Query {
                what: table,
                source,
            })?;
        Ok(n.max(0) as usize)
    }

    pub fn galaxy_count(&self) -> Result<usize, StoreError> {
        self.count("galaxies")
    }

    pub fn star_count(&self) -> Result<usize, StoreError> {
        self.count("stars")
    }
}

impl Store for SqliteStore {
    fn scan_galaxies(&self, sink: &mut dyn FnMut(Galaxy) -> bool) -> Result<usize, StoreError> {
        self.scan_rows(SELECT_GALAXIES_SQL, [], "galaxies", galaxy_from_row, sink)
    }

    fn scan_stars(
        &self,
        galaxy_id: i64,
        sink: &mut dyn FnMut(Star) -> bool,
    ) -> Result<usize, StoreError> {
        self.scan_rows(SELECT_STARS_SQL, [galaxy_id], "stars", star_from_row, sink)
    }

    fn find_galaxy(&self, ugc_number: &str) -> Result<Galaxy, StoreError> {
        let mut found: Option<Galaxy> = None;
        self.scan_rows(
            SELECT_GALAXY_BY_UGC_SQL,
            [ugc_number],
            "galaxies",
            galaxy_from_row,
            &mut |g: Galaxy| {
                found = Some(g);
                false
            },
        )?;
        found.ok_or_else(|| StoreError::NotFound {
            ugc_number: ugc_number.to_string(),
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute_batch(CLEAR_SQL)
            .map_err(|source| StoreError::Write {
                what: "clear",
                source,
            })?;
        debug!("Cleared galaxies and stars");
        Ok(())
    }
}
