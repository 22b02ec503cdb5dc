//! Writes used to bootstrap a catalogue: single inserts and the demo seed.

use log::debug;
use rusqlite::Connection;

use super::{INSERT_GALAXY_SQL, INSERT_STAR_SQL, SqliteStore, StoreError};

/// Demo catalogue: `(ugc_number, galaxy name, [(star name, gaia catalogue id)])`.
pub const DEMO_CATALOG: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "ugc_number1",
        "Milky Way",
        &[
            ("Sun", "gaia_catalogue_id1"),
            ("Alpha Centauri", "gaia_catalogue_id2"),
        ],
    ),
    (
        "ugc_number2",
        "Andromeda",
        &[
            ("Star3", "gaia_catalogue_id3"),
            ("Star4", "gaia_catalogue_id4"),
            ("Star5", "gaia_catalogue_id5"),
        ],
    ),
];

fn insert_galaxy(conn: &Connection, ugc_number: &str, name: &str) -> Result<i64, StoreError> {
    conn.execute(INSERT_GALAXY_SQL, (ugc_number, name))
        .map_err(|source| StoreError::Write {
            what: "galaxy",
            source,
        })?;
    Ok(conn.last_insert_rowid())
}

fn insert_star(
    conn: &Connection,
    galaxy_id: i64,
    name: &str,
    gaia_catalogue_id: &str,
) -> Result<i64, StoreError> {
    conn.execute(INSERT_STAR_SQL, (galaxy_id, name, gaia_catalogue_id))
        .map_err(|source| StoreError::Write {
            what: "star",
            source,
        })?;
    Ok(conn.last_insert_rowid())
}

impl SqliteStore {
    /// Insert a galaxy and return its id. A duplicate `ugc_number` is a [`StoreError::Write`].
    pub fn add_galaxy(&self, ugc_number: &str, name: &str) -> Result<i64, StoreError> {
        let conn = self.pool.get()?;
        insert_galaxy(&conn, ugc_number, name)
    }

    /// Insert a star under `galaxy_id` and return its id. Unknown galaxies are rejected by the
    /// foreign key.
    pub fn add_star(
        &self,
        galaxy_id: i64,
        name: &str,
        gaia_catalogue_id: &str,
    ) -> Result<i64, StoreError> {
        let conn = self.pool.get()?;
        insert_star(&conn, galaxy_id, name, gaia_catalogue_id)
    }

    /// Insert [`DEMO_CATALOG`] in one transaction. Call after [`Store::clear`](super::Store::clear)
    /// for a fresh catalogue.
    pub fn seed_demo_catalog(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let write_err = |source: rusqlite::Error| StoreError::Write {
            what: "seed",
            source,
        };
        let tx = conn.unchecked_transaction().map_err(write_err)?;
        for (ugc_number, name, stars) in DEMO_CATALOG {
            let galaxy_id = insert_galaxy(&tx, ugc_number, name)?;
            for (star_name, gaia_catalogue_id) in stars.iter() {
                insert_star(&tx, galaxy_id, star_name, gaia_catalogue_id)?;
            }
        }
        tx.commit().map_err(write_err)?;
        debug!("Seeded {} demo galaxies", DEMO_CATALOG.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::db_ops::Store;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("seed.db"), 2).unwrap();
        (dir, store)
    }

    #[test]
    fn seed_inserts_two_galaxies_and_five_stars() {
        let (_dir, store) = store();
        store.seed_demo_catalog().unwrap();
        assert_eq!(store.galaxy_count().unwrap(), 2);
        assert_eq!(store.star_count().unwrap(), 5);
    }

    #[test]
    fn clear_removes_everything() {
        let (_dir, store) = store();
        store.seed_demo_catalog().unwrap();
        store.clear().unwrap();
        assert_eq!(store.galaxy_count().unwrap(), 0);
        assert_eq!(store.star_count().unwrap(), 0);
    }

    #[test]
    fn duplicate_ugc_number_is_rejected() {
        let (_dir, store) = store();
        store.add_galaxy("ugc_dup", "First").unwrap();
        assert!(matches!(
            store.add_galaxy("ugc_dup", "Second"),
            Err(StoreError::Write { .. })
        ));
    }

    #[test]
    fn star_needs_existing_galaxy() {
        let (_dir, store) = store();
        assert!(matches!(
            store.add_star(4242, "Orphan", "gaia_orphan"),
            Err(StoreError::Write { .. })
        ));
    }

    #[test]
    fn ugc_number_is_immutable() {
        let (_dir, store) = store();
        let id = store.add_galaxy("ugc_fixed", "Fixed").unwrap();
        let conn = store.pool().get().unwrap();
        let res = conn.execute(
            "UPDATE galaxies SET ugc_number = 'ugc_moved' WHERE id = ?1",
            [id],
        );
        assert!(res.is_err());
        // Other columns stay writable.
        conn.execute("UPDATE galaxies SET name = 'Renamed' WHERE id = ?1", [id])
            .unwrap();
    }
}
