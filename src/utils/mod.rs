pub mod config;
pub(crate) mod env;
pub mod logger;
pub(crate) mod starcat_toml;

pub use config::*;
pub use logger::setup_logging;
