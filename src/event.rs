//! Event — the message envelope exchanged over the relay websocket.
//!
//! ARCHITECTURE
//! ============
//! Every websocket text message is a JSON object `{"event": ..., "data": ...}`.
//! Clients submit `send_frame` events; the server answers each with exactly
//! one `hand_keypoints` or `error` event on the same connection.
//!
//! DESIGN
//! ======
//! - Inbound and outbound events are separate tagged enums so the compiler
//!   rejects a server trying to emit a client event and vice versa.
//! - Errors stay typed until `ServerEvent::error_from`, which is the only
//!   place a failure becomes a user-facing string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// EVENT NAMES
// =============================================================================

pub const EVENT_SEND_FRAME: &str = "send_frame";
pub const EVENT_CONNECTED: &str = "connected";
pub const EVENT_HAND_KEYPOINTS: &str = "hand_keypoints";
pub const EVENT_ERROR: &str = "error";

/// Error code for envelopes that fail to parse or name an unknown event.
pub const CODE_BAD_EVENT: &str = "E_BAD_EVENT";

/// Error code for messages over `WS_MAX_MESSAGE_BYTES`.
pub const CODE_TOO_LARGE: &str = "E_TOO_LARGE";

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code carried next to the message on `error` events.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// KEYPOINT
// =============================================================================

/// One hand landmark in image pixel space. `id` is the landmark's index in
/// the detector's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypoint {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

// =============================================================================
// INBOUND
// =============================================================================

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One encoded frame: `data:image/<fmt>;base64,<payload>`.
    SendFrame(String),
}

impl ClientEvent {
    /// Parse one websocket text message.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the text is not a known event envelope.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// Events the server emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent once right after the websocket upgrade.
    Connected { client_id: Uuid },
    /// Detection result for one frame. Empty when no hand was found.
    HandKeypoints { keypoints: Vec<Keypoint> },
    /// Failure for the most recent frame or envelope.
    Error { error: String, code: String },
}

impl ServerEvent {
    #[must_use]
    pub fn keypoints(keypoints: Vec<Keypoint>) -> Self {
        Self::HandKeypoints { keypoints }
    }

    /// Build an error event from a typed error.
    #[must_use]
    pub fn error_from(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self::Error { error: err.to_string(), code: err.error_code().to_string() }
    }

    /// Build an error event for an envelope that could not be dispatched.
    #[must_use]
    pub fn bad_event(message: impl Into<String>) -> Self {
        Self::Error { error: message.into(), code: CODE_BAD_EVENT.to_string() }
    }

    /// Build an error event for a message rejected by size.
    #[must_use]
    pub fn too_large(len: usize, max: usize) -> Self {
        Self::Error {
            error: format!("message of {len} bytes exceeds the {max} byte limit"),
            code: CODE_TOO_LARGE.to_string(),
        }
    }

    /// Wire name of this event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => EVENT_CONNECTED,
            Self::HandKeypoints { .. } => EVENT_HAND_KEYPOINTS,
            Self::Error { .. } => EVENT_ERROR,
        }
    }

    /// Serialize to the JSON text sent over the socket.
    ///
    /// # Errors
    ///
    /// Returns the serde error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
