//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating [`Config`](super::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric or boolean variable could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },

    /// Threshold is NaN or infinite.
    #[error("threshold must be finite, got {value}")]
    NonFiniteThreshold { value: f32 },

    /// Context weight is outside `[0, 1]`.
    #[error("context weight must be within [0, 1], got {value}")]
    ContextWeightOutOfRange { value: f32 },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
