//! Services module - HTTP handlers per concern

pub mod message;
pub mod room;
pub mod typing;

// Re-exports to simplify imports
pub use message::{get_room_messages, send_message};
pub use room::{create_room, list_rooms};
pub use typing::set_typing;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
