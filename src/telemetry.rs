//! Tracing subscriber setup for the binary's front ends.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Human-readable logs on stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_server_logging() -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter_or("info")),
        )
        .try_init()?;
    Ok(())
}

/// JSON lines at DEBUG to `log_path`, plus stderr filtered by `RUST_LOG`
/// (default `warn`) so stdout stays clean for results.
pub fn init_cli_logging(log_path: &Path) -> Result<(), TelemetryError> {
    let file = open_log_file(log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter_or("warn")),
        )
        .try_init()?;
    Ok(())
}

/// Opens `path` for appending, creating parent directories.
pub fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    let to_err = |source| TelemetryError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(to_err)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)
}
