//! Detector — pluggable hand-landmark detection capability.
//!
//! DESIGN
//! ======
//! Landmark detection is delegated to an external model. The relay only
//! sees the `HandDetector` trait; the concrete backend is chosen once at
//! startup from `DETECTOR_URL` and shared by every connection through
//! `AppState`.

pub mod config;
pub mod http;
pub mod types;

use std::sync::Arc;

use config::DetectorConfig;
pub use types::{DetectParams, DetectionError, Hand, HandDetector, Landmark};

use crate::decode::BgrImage;

/// Backend used when no detector service is configured. Reports no hands
/// for every frame, so clients keep receiving `hand_keypoints`.
pub struct DisabledDetector;

#[async_trait::async_trait]
impl HandDetector for DisabledDetector {
    async fn detect(&self, _image: &BgrImage, _params: DetectParams) -> Result<Vec<Hand>, DetectionError> {
        Ok(Vec::new())
    }
}

/// Build the detector backend selected by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn from_config(config: &DetectorConfig) -> Result<Arc<dyn HandDetector>, DetectionError> {
    let Some(url) = &config.url else {
        tracing::warn!("DETECTOR_URL not set — hand detection disabled, frames will report no hands");
        return Ok(Arc::new(DisabledDetector));
    };

    let detector = http::HttpDetector::new(url.clone(), config.timeouts)?;
    tracing::info!(url = detector.url(), max_hands = config.params.max_hands, "hand detector initialized");
    Ok(Arc::new(detector))
}
