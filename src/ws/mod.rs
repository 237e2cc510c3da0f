//! WebSocket Module - per-client real-time delivery
//!
//! Each connected client gets one socket. The socket is auto-attached to
//! the client's personal channel (and company channel, when any) and the
//! client subscribes to room channels explicitly with `Subscribe` frames.
//! Every subscribe attempt is authorized before any event flows.

pub mod connection;

// Public re-exports
pub use connection::handle_socket;

use crate::{AppState, entities::User};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Entry point for WebSocket upgrade requests. Identity comes from the
/// authentication middleware layered on the route.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, current_user))
}
