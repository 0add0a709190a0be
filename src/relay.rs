//! Frame relay — one encoded frame in, one detection result out.
//!
//! DESIGN
//! ======
//! `process_frame` is pure business logic: decode, detect, map. It returns a
//! typed result and never touches the socket. The websocket layer turns the
//! result into exactly one outbound event.
//!
//! Decode runs on the blocking pool. Frames from different connections run
//! their detector calls concurrently; only an operator-set
//! `DETECT_MAX_CONCURRENCY` makes them hold a shared permit.

use tracing::debug;

use crate::decode::{self, BgrImage, DecodeError, ImageFormatError};
use crate::detector::{DetectionError, Hand};
use crate::event::{ErrorCode, Keypoint, ServerEvent};
use crate::state::AppState;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Everything that can fail while relaying a single frame.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    ImageFormat(#[from] ImageFormatError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

impl ErrorCode for RelayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(e) => e.error_code(),
            Self::ImageFormat(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
        }
    }
}

// =============================================================================
// RELAY
// =============================================================================

/// Decode one data-URI frame into a BGR pixel buffer.
pub fn decode_frame(frame: &str) -> Result<BgrImage, RelayError> {
    let bytes = decode::decode_payload(frame)?;
    Ok(decode::decode_image(&bytes)?)
}

/// Run the full relay contract for one frame and return its keypoints.
pub async fn process_frame(state: &AppState, frame: String) -> Result<Vec<Keypoint>, RelayError> {
    let image = tokio::task::spawn_blocking(move || decode_frame(&frame))
        .await
        .map_err(|e| ImageFormatError::Aborted(e.to_string()))??;

    let hands = match &state.detect_permits {
        Some(permits) => {
            let _permit = permits
                .acquire()
                .await
                .map_err(|_| DetectionError::Unavailable)?;
            state.detector.detect(&image, state.params).await?
        }
        None => state.detector.detect(&image, state.params).await?,
    };

    let keypoints = keypoints_from_hands(hands);
    debug!(width = image.width, height = image.height, count = keypoints.len(), "relay: frame processed");
    Ok(keypoints)
}

/// Process one frame and convert the outcome into the event to emit.
pub async fn handle_frame(state: &AppState, frame: String) -> ServerEvent {
    match process_frame(state, frame).await {
        Ok(keypoints) => ServerEvent::keypoints(keypoints),
        Err(e) => ServerEvent::error_from(&e),
    }
}

/// Map the first detected hand to keypoints, ids following landmark order.
/// Any further hands are dropped.
#[must_use]
pub fn keypoints_from_hands(hands: Vec<Hand>) -> Vec<Keypoint> {
    let Some(hand) = hands.into_iter().next() else {
        return Vec::new();
    };
    (0u32..)
        .zip(hand.landmarks)
        .map(|(id, lm)| Keypoint { id, x: to_pixel(lm.x), y: to_pixel(lm.y), z: to_pixel(lm.z) })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn to_pixel(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
