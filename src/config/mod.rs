//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SEMFIND_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::CachePolicy;
use crate::constants::{
    DEFAULT_CONTEXT_CHARS, DEFAULT_CONTEXT_WEIGHT, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_SEQ_LEN,
    DEFAULT_SERVICE_THRESHOLD,
};
use crate::embedding::EncoderConfig;
use crate::matching::MatchParams;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SEMFIND_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Sentence-encoder model directory. `None` runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Max tokens per encoded text. Default: `512`.
    pub max_seq_len: usize,

    /// Threshold used when a request does not carry one. Default: `0.65`.
    pub threshold: f32,

    /// Context window margin in characters. Default: `10`.
    pub context_chars: usize,

    /// Candidate score weight in the blend. Default: `0.8`.
    pub context_weight: f32,

    /// Result cache capacity; `0` means unbounded. Default: `0`.
    pub cache_capacity: u64,

    /// Load the model before accepting requests. Default: `false`.
    pub preload: bool,

    /// Request body limit. Default: 16 MiB.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            threshold: DEFAULT_SERVICE_THRESHOLD,
            context_chars: DEFAULT_CONTEXT_CHARS,
            context_weight: DEFAULT_CONTEXT_WEIGHT,
            cache_capacity: 0,
            preload: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SEMFIND_PORT";
    const ENV_BIND_ADDR: &'static str = "SEMFIND_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = EncoderConfig::ENV_MODEL_PATH;
    const ENV_MAX_SEQ_LEN: &'static str = EncoderConfig::ENV_MAX_SEQ_LEN;
    const ENV_THRESHOLD: &'static str = "SEMFIND_THRESHOLD";
    const ENV_CONTEXT_CHARS: &'static str = "SEMFIND_CONTEXT_CHARS";
    const ENV_CONTEXT_WEIGHT: &'static str = "SEMFIND_CONTEXT_WEIGHT";
    const ENV_CACHE_CAPACITY: &'static str = "SEMFIND_CACHE_CAPACITY";
    const ENV_PRELOAD: &'static str = "SEMFIND_PRELOAD";
    const ENV_MAX_BODY_BYTES: &'static str = "SEMFIND_MAX_BODY_BYTES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            model_path: Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH),
            max_seq_len: Self::parse_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?,
            threshold: Self::parse_from_env(Self::ENV_THRESHOLD, defaults.threshold)?,
            context_chars: Self::parse_from_env(Self::ENV_CONTEXT_CHARS, defaults.context_chars)?,
            context_weight: Self::parse_from_env(
                Self::ENV_CONTEXT_WEIGHT,
                defaults.context_weight,
            )?,
            cache_capacity: Self::parse_from_env(
                Self::ENV_CACHE_CAPACITY,
                defaults.cache_capacity,
            )?,
            preload: Self::parse_bool_from_env(Self::ENV_PRELOAD, defaults.preload)?,
            max_body_bytes: Self::parse_from_env(
                Self::ENV_MAX_BODY_BYTES,
                defaults.max_body_bytes,
            )?,
        })
    }

    /// Checks value ranges and the model path (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort {
                value: self.port.to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                value: self.max_seq_len.to_string(),
            });
        }

        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold {
                value: self.threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.context_weight) {
            return Err(ConfigError::ContextWeightOutOfRange {
                value: self.context_weight,
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            context_chars: self.context_chars,
            context_weight: self.context_weight,
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::from_capacity(self.cache_capacity)
    }

    /// Encoder for `model_path`, or the stub encoder when unset.
    pub fn encoder_config(&self) -> EncoderConfig {
        let config = match self.model_path {
            Some(ref path) => EncoderConfig::new(path.clone()),
            None => EncoderConfig::stub(),
        };
        config.with_max_seq_len(self.max_seq_len)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_from_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue { name, value }),
            },
            Err(_) => Ok(default),
        }
    }
}
