//! Server configuration parsed from environment variables.
//!
//! Parsing goes through a lookup function so tests can feed a fixed map
//! instead of mutating the process environment. Malformed values are startup
//! errors; only absent variables fall back to defaults.

use std::str::FromStr;

use crate::detector::config::DetectorConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_WS_MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: &'static str, reason: &'static str },
}

// =============================================================================
// CORS
// =============================================================================

/// Allowed browser origins for the HTTP and websocket endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` (or an empty value) allows every origin; otherwise a
    /// comma-separated list of exact origins.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            return Self::Any;
        }
        Self::List(origins)
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsOrigins,
    /// Optional cap on detector calls running at once across all connections.
    /// `None` leaves connections fully independent.
    pub detect_max_concurrency: Option<usize>,
    pub ws_max_message_bytes: usize,
    pub detector: DetectorConfig,
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// - `HOST`: default `0.0.0.0`
    /// - `PORT`: default 5000
    /// - `CORS_ALLOWED_ORIGINS`: default `*`
    /// - `DETECT_MAX_CONCURRENCY`: unset means no shared cap
    /// - `WS_MAX_MESSAGE_BYTES`: default 16 MiB
    /// - `DETECTOR_*`: see [`DetectorConfig::from_lookup`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let cors = lookup("CORS_ALLOWED_ORIGINS").map_or(CorsOrigins::Any, |raw| CorsOrigins::parse(&raw));

        let detect_max_concurrency: Option<usize> = parse_opt_var(&lookup, "DETECT_MAX_CONCURRENCY")?;
        if detect_max_concurrency == Some(0) {
            return Err(ConfigError::OutOfRange { key: "DETECT_MAX_CONCURRENCY", reason: "must be at least 1" });
        }
        let ws_max_message_bytes = parse_var(&lookup, "WS_MAX_MESSAGE_BYTES", DEFAULT_WS_MAX_MESSAGE_BYTES)?;

        let detector = DetectorConfig::from_lookup(&lookup)?;

        Ok(Self { host, port, cors, detect_max_concurrency, ws_max_message_bytes, detector })
    }

    /// Socket address string for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse `key` with `FromStr`, falling back to `default` only when unset.
pub(crate) fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Parse `key` with `FromStr`, yielding `None` when unset.
pub(crate) fn parse_opt_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value: raw })
        })
        .transpose()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
