//! Detector types — backend-neutral capability trait, landmarks and errors.

use crate::decode::BgrImage;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a hand detector backend.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// The request to the detector could not be sent or read.
    #[error("detector request failed: {0}")]
    Request(String),

    /// The detector answered with a non-success HTTP status.
    #[error("detector returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The detector response body could not be deserialized.
    #[error("detector response parse failed: {0}")]
    Parse(String),

    /// A landmark was not an `(x, y, z)` triple.
    #[error("landmark {index} of hand {hand} has {len} coordinates, expected 3")]
    LandmarkShape { hand: usize, index: usize, len: usize },

    /// The detection limiter was closed; the server is shutting down.
    #[error("detector unavailable")]
    Unavailable,

    /// The detector client could not be constructed.
    #[error("detector client build failed: {0}")]
    ClientBuild(String),
}

impl crate::event::ErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        "E_DETECTION"
    }
}

// =============================================================================
// LANDMARKS
// =============================================================================

/// One landmark as reported by the detector. `x` and `y` are pixel
/// coordinates in the submitted image; `z` is relative depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One detected hand: its landmarks in the detector's index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Per-call detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectParams {
    pub max_hands: u32,
    pub detection_confidence: f32,
    /// Ask the detector to mirror handedness for selfie-view input.
    pub flip: bool,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self { max_hands: 1, detection_confidence: 0.8, flip: false }
    }
}

// =============================================================================
// CAPABILITY
// =============================================================================

/// Hand-landmark detection capability.
///
/// Implementations must be effectively stateless per call: the same instance
/// is shared by every connection.
#[async_trait::async_trait]
pub trait HandDetector: Send + Sync {
    async fn detect(&self, image: &BgrImage, params: DetectParams) -> Result<Vec<Hand>, DetectionError>;
}
