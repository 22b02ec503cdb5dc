//! Database operations: schema, pooled connections, the `Store` seam and seeding.

mod error;
mod pool;
mod seed;
mod store;

pub use error::StoreError;
pub use pool::{ConnectionPool, PooledConnection};
pub use seed::DEMO_CATALOG;
pub use store::{SqliteStore, Store};

/// WAL tuning pragmas. Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        "#;

/// Per-connection pragmas (foreign keys are off by default in SQLite and are per connection).
pub(crate) const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Schema for galaxies and stars. `ugc_number` is unique and may not be updated.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS galaxies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    ugc_number TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS stars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    galaxy_id INTEGER NOT NULL REFERENCES galaxies(id),
    name TEXT NOT NULL,
    gaia_catalogue_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_stars_galaxy_id ON stars(galaxy_id);

CREATE TRIGGER IF NOT EXISTS galaxies_ugc_number_immutable
BEFORE UPDATE OF ugc_number ON galaxies
WHEN NEW.ugc_number IS NOT OLD.ugc_number
BEGIN
    SELECT RAISE(ABORT, 'ugc_number is immutable');
END;
"#;

pub(crate) const SELECT_GALAXIES_SQL: &str =
    "SELECT id, name, ugc_number, created_at FROM galaxies ORDER BY id";

pub(crate) const SELECT_GALAXY_BY_UGC_SQL: &str =
    "SELECT id, name, ugc_number, created_at FROM galaxies WHERE ugc_number = ?1";

pub(crate) const SELECT_STARS_SQL: &str = "SELECT id, galaxy_id, name, gaia_catalogue_id, created_at FROM stars WHERE galaxy_id = ?1 ORDER BY id";

pub(crate) const INSERT_GALAXY_SQL: &str =
    "INSERT INTO galaxies (ugc_number, name) VALUES (?1, ?2)";

pub(crate) const INSERT_STAR_SQL: &str =
    "INSERT INTO stars (galaxy_id, name, gaia_catalogue_id) VALUES (?1, ?2, ?3)";

/// Children first: stars reference galaxies.
pub(crate) const CLEAR_SQL: &str = "DELETE FROM stars; DELETE FROM galaxies;";
