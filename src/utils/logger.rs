use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use env_logger::{Builder, Target};
use log::Level;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::config::LOG_TIMESTAMP_FORMAT;

/// Install the global logger. Lines go to stderr, or are appended to `log_file` when given
/// (created if missing). Every line starts with a `YYYY/MM/DD HH:MM:SS` timestamp.
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level); // Our crate: use requested level

    let colorize = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
            false
        }
        None => true,
    };

    builder.format(move |buf, record| {
        let ts = Local::now().format(LOG_TIMESTAMP_FORMAT);
        let line = match record.level() {
            Level::Error | Level::Warn if colorize => {
                let level_str = match record.level() {
                    Level::Warn => "WARN".yellow(),
                    _ => "ERROR".red(),
                };
                let path = record.target().to_string().white();
                format!("{} [{} {}] {}", ts, level_str, path, record.args())
            }
            Level::Error | Level::Warn => {
                format!("{} [{} {}] {}", ts, record.level(), record.target(), record.args())
            }
            _ => format!("{} {}", ts, record.args()),
        };
        writeln!(buf, "{}", line)
    });

    builder
        .try_init()
        .context("install logger (already initialised?)")?;
    Ok(())
}
