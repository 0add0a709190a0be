//! WebSocket handler — per-connection frame relay loop.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, sends `connected`, then reads messages
//! one at a time. Each text message is parsed into a `ClientEvent` and
//! dispatched; the reply event is written before the next message is read,
//! so a connection never has more than one frame in flight. Unread frames
//! wait in the socket.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `connected` with `client_id`
//! 2. Client sends `send_frame` → relay → `hand_keypoints` | `error`
//! 3. Close or transport error → log and drop

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{ClientEvent, EVENT_SEND_FRAME, ServerEvent};
use crate::relay;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

/// The transport keeps axum's own message limit; `WS_MAX_MESSAGE_BYTES` is
/// enforced per message in `process_inbound_text` so an oversized frame gets
/// an `error` event instead of a dropped connection.
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    if send_event(&mut socket, client_id, &ServerEvent::Connected { client_id })
        .await
        .is_err()
    {
        return;
    }

    info!(%client_id, "ws: client connected");

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!(%client_id, error = %e, "ws: receive failed");
                break;
            }
        };
        match msg {
            Message::Text(text) => {
                let reply = process_inbound_text(&state, client_id, &text).await;
                if send_event(&mut socket, client_id, &reply).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse one inbound text message and return the single event to send back.
///
/// Keeps transport concerns out of event handling so tests can drive
/// dispatch without a socket.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> ServerEvent {
    if text.len() > state.ws_max_message_bytes {
        warn!(%client_id, bytes = text.len(), max = state.ws_max_message_bytes, "ws: inbound message too large");
        return ServerEvent::too_large(text.len(), state.ws_max_message_bytes);
    }

    let event = match ClientEvent::parse(text) {
        Ok(e) => e,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound event");
            return ServerEvent::bad_event(format!("invalid event: {e}"));
        }
    };

    match event {
        ClientEvent::SendFrame(frame) => {
            debug!(%client_id, event = EVENT_SEND_FRAME, bytes = frame.len(), "ws: recv event");
            relay::handle_frame(state, frame).await
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, client_id: Uuid, event: &ServerEvent) -> Result<(), ()> {
    let json = match event.to_json() {
        Ok(j) => j,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };

    match event {
        ServerEvent::Error { error, code } => {
            warn!(%client_id, code = %code, message = %error, "ws: send event=error");
        }
        ServerEvent::HandKeypoints { keypoints } => {
            debug!(%client_id, count = keypoints.len(), "ws: send event=hand_keypoints");
        }
        ServerEvent::Connected { .. } => {
            debug!(%client_id, event = event.name(), "ws: send event");
        }
    }

    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| debug!(%client_id, error = %e, "ws: send failed"))
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
