//! File logging. The terminal is owned by the TUI, so everything goes to a
//! rolling file under the data directory.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "bookshelf";

/// Parse a level name, case-insensitively.
pub fn parse_level(raw: &str) -> Result<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!(
            "log level must be one of trace, debug, info, warn, error (got \"{other}\")"
        )),
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program or buffered lines are lost on exit.
pub fn init(config: &LogConfig, dir: &Path) -> Result<WorkerGuard> {
    let level = parse_level(&config.level)?;
    fs::create_dir_all(dir).context("failed to create log directory")?;

    let mut appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log");
    if let Some(keep) = config.keep {
        appender = appender.max_log_files(keep);
    }
    let appender = appender
        .build(dir)
        .context("failed to create log file appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))?;

    Ok(guard)
}
