//! Logging setup
//!
//! Log lines go to stderr and are appended to `<log_dir>/snapshot.log`.
//! `RUST_LOG`, when set, overrides the configured level.

use clap::ValueEnum;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name inside the log directory
pub const LOG_FILE: &str = "snapshot.log";

/// Verbosity levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    /// Everything, including per-poll detail
    Debug,
    /// Stage progress
    #[default]
    Info,
    /// Degraded heuristics and timeouts
    Warning,
    /// Failures only
    Error,
    /// Failures only
    Critical,
}

impl LogLevel {
    /// The `tracing` filter directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Install the global subscriber. Returns the log file path.
pub fn init(level: LogLevel, log_dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directives() {
        assert_eq!(LogLevel::Debug.directive(), "debug");
        assert_eq!(LogLevel::Info.directive(), "info");
        assert_eq!(LogLevel::Warning.directive(), "warn");
        assert_eq!(LogLevel::Error.directive(), "error");
        assert_eq!(LogLevel::Critical.directive(), "error");
    }

    #[test]
    fn test_level_names_are_upper_case() {
        let level = LogLevel::from_str("WARNING", false).unwrap();
        assert_eq!(level, LogLevel::Warning);
        assert!(LogLevel::from_str("verbose", true).is_err());
    }

    #[test]
    fn test_default_level() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
