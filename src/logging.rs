//! Tracing initialization.
//!
//! The terminal belongs to the TUI, so events only ever go to a log file.
//! Without a log file no subscriber is installed and every event is dropped.

use crate::error::{FilerError, Result};
use chrono::Local;
use std::fmt as stdfmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var holding an `EnvFilter` directive that replaces the `-v` level
pub const LOG_ENV: &str = "FILER_LOG";

/// Local timestamp (YYYY-MM-DD HH:MM:SS)
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Maps the `-v` count to a level: info, debug, then trace
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Installs the global subscriber writing to `log_file`.
///
/// Returns the appender guard, which must be held until shutdown so buffered
/// lines are flushed.
pub fn init_tracing(level: LevelFilter, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                FilerError::ConfigError(format!(
                    "Failed to create log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            FilerError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = tsfmt::layer()
        .with_timer(LocalTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init()
        .map_err(|e| FilerError::ConfigError(format!("Failed to initialise logging: {}", e)))?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(1), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(2), LevelFilter::TRACE);
        assert_eq!(level_for_verbosity(9), LevelFilter::TRACE);
    }

    #[test]
    fn test_no_log_file_installs_nothing() {
        let guard = init_tracing(LevelFilter::INFO, None).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_unopenable_log_file_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let result = init_tracing(LevelFilter::INFO, Some(temp_dir.path()));
        assert!(matches!(result, Err(FilerError::ConfigError(_))));
    }
}
