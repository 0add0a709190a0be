//! Detector configuration parsed from environment variables.

use super::types::DetectParams;
use crate::config::{ConfigError, parse_var};

/// Not configurable: only the first hand is reported.
pub const MAX_HANDS: u32 = 1;
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.8;
pub const DEFAULT_DETECTOR_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DETECTOR_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Endpoint of the external hand-landmark service. `None` disables
    /// detection: every frame reports no hands.
    pub url: Option<String>,
    pub params: DetectParams,
    pub timeouts: DetectorTimeouts,
}

impl DetectorConfig {
    /// Build typed detector config.
    ///
    /// Optional:
    /// - `DETECTOR_URL`: unset disables detection
    /// - `DETECTOR_CONFIDENCE`: default 0.8, must be within `[0, 1]`
    /// - `DETECTOR_REQUEST_TIMEOUT_SECS`: default 10
    /// - `DETECTOR_CONNECT_TIMEOUT_SECS`: default 5
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DETECTOR_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let detection_confidence = parse_var(lookup, "DETECTOR_CONFIDENCE", DEFAULT_DETECTION_CONFIDENCE)?;
        if !(0.0..=1.0).contains(&detection_confidence) {
            return Err(ConfigError::OutOfRange { key: "DETECTOR_CONFIDENCE", reason: "must be within [0, 1]" });
        }

        let timeouts = DetectorTimeouts {
            request_secs: parse_var(lookup, "DETECTOR_REQUEST_TIMEOUT_SECS", DEFAULT_DETECTOR_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_var(lookup, "DETECTOR_CONNECT_TIMEOUT_SECS", DEFAULT_DETECTOR_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { url, params: DetectParams { max_hands: MAX_HANDS, detection_confidence, flip: false }, timeouts })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
