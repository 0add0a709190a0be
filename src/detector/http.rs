//! HTTP hand-landmark service client.
//!
//! Thin wrapper around a single `POST` endpoint. The service receives the
//! raw BGR pixels (base64) with the detection parameters and answers with
//! one landmark list per hand. Pure parsing in `parse_response` for
//! testability.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::config::DetectorTimeouts;
use super::types::{DetectParams, DetectionError, Hand, HandDetector, Landmark};
use crate::decode::BgrImage;

const PIXEL_FORMAT: &str = "bgr8";

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpDetector {
    http: reqwest::Client,
    url: String,
}

impl HttpDetector {
    pub fn new(url: String, timeouts: DetectorTimeouts) -> Result<Self, DetectionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| DetectionError::ClientBuild(e.to_string()))?;
        Ok(Self { http, url })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl HandDetector for HttpDetector {
    async fn detect(&self, image: &BgrImage, params: DetectParams) -> Result<Vec<Hand>, DetectionError> {
        let body = ApiRequest::new(image, params);

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DetectionError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DetectionError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(DetectionError::Status { status: status.as_u16(), body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, serde::Serialize)]
struct ApiRequest {
    width: u32,
    height: u32,
    format: &'static str,
    pixels: String,
    max_hands: u32,
    detection_confidence: f32,
    flip: bool,
}

impl ApiRequest {
    fn new(image: &BgrImage, params: DetectParams) -> Self {
        Self {
            width: image.width,
            height: image.height,
            format: PIXEL_FORMAT,
            pixels: STANDARD.encode(&image.data),
            max_hands: params.max_hands,
            detection_confidence: params.detection_confidence,
            flip: params.flip,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    hands: Vec<ApiHand>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiHand {
    landmarks: Vec<Vec<f64>>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a detector response body into hands, rejecting any landmark that
/// is not an `(x, y, z)` triple.
pub(crate) fn parse_response(text: &str) -> Result<Vec<Hand>, DetectionError> {
    let api: ApiResponse = serde_json::from_str(text).map_err(|e| DetectionError::Parse(e.to_string()))?;

    api.hands
        .into_iter()
        .enumerate()
        .map(|(hand, h)| {
            let landmarks = h
                .landmarks
                .into_iter()
                .enumerate()
                .map(|(index, coords)| match coords.as_slice() {
                    [x, y, z] => Ok(Landmark::new(*x, *y, *z)),
                    _ => Err(DetectionError::LandmarkShape { hand, index, len: coords.len() }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Hand { landmarks })
        })
        .collect()
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
