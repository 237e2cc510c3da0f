//! Typing indicator service
//!
//! Pure fan-out: nothing is persisted, the event just reaches whoever is
//! subscribed to the room channel right now.

use crate::core::{AppError, AppState};
use crate::delivery::{self, room_channel};
use crate::dtos::{TypingEventDTO, TypingRequest};
use crate::entities::User;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[instrument(skip(state, current_user, body), fields(room_id = %room_id, user_id = %current_user.user_id))]
pub async fn set_typing(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Extension(current_user): Extension<User>, // membership checked by middleware
    Json(body): Json<TypingRequest>,
) -> Result<StatusCode, AppError> {
    let event = if body.is_typing {
        delivery::EVENT_USER_TYPING
    } else {
        delivery::EVENT_USER_STOPPED_TYPING
    };

    let payload = TypingEventDTO {
        user_id: current_user.user_id.clone(),
        user_name: current_user.name.clone(),
        is_typing: body.is_typing,
    };

    match serde_json::to_value(&payload) {
        Ok(data) => {
            let reached = state.broker.publish(&room_channel(&room_id), event, data);
            debug!(receivers = reached, "Typing event published");
        }
        Err(e) => warn!("Failed to serialize typing event: {}", e),
    }

    Ok(StatusCode::NO_CONTENT)
}
