//! Engine module: storage and the CLI front end

pub mod arg_parser;
pub mod cli;
pub mod db_ops;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
pub use db_ops::{ConnectionPool, DEMO_CATALOG, PooledConnection, SqliteStore, Store, StoreError};
