//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router: a static liveness text at `/` and the frame relay
//! websocket at `/ws`. CORS applies to both.

pub mod ws;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsOrigins;
use crate::state::AppState;

pub const INDEX_BODY: &str = "Hand Detection WebSocket Server";

pub fn app(state: AppState, origins: &CorsOrigins) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws::handle_ws))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::from(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!(%origin, "cors: ignoring invalid origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn index() -> &'static str {
    INDEX_BODY
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
