//! Logging infrastructure for the Sojourn client.
//!
//! Structured logging via the `tracing` ecosystem. The TUI owns the terminal,
//! so the console layer writes to stderr and is mostly useful when the app
//! exits; the JSON file log under `~/.sojourn/logs/` is the primary record
//! of a session, including the per-record stream parse warnings.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Result, SojournError};

/// Guard that must be held to ensure log flushing on shutdown.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the Sojourn logging system.
///
/// Sets up daily-rolling JSON file logs plus a compact console layer on
/// stderr. `verbose` switches the default level from INFO to DEBUG; the
/// `RUST_LOG` environment variable overrides both.
///
/// Returns a [`LogGuard`] that must be held for the application lifetime so
/// pending entries are flushed on shutdown.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| SojournError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sojourn.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sojourn={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path, `~/.sojourn/logs/`.
pub fn default_log_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| SojournError::Internal {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".sojourn").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        // SAFETY: test context, only test touching HOME in this crate
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.sojourn/logs"));
    }

    #[test]
    fn test_init_test_logging() {
        // Should not panic when called more than once
        init_test_logging();
        init_test_logging();
    }
}
