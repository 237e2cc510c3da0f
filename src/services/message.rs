//! Message services - the message store accessor
//!
//! Cursor-paginated history reads and the send path: persist, bump the
//! room's recency, then publish the new-message event best-effort.

use crate::core::{AppError, AppState};
use crate::delivery::{self, room_channel};
use crate::dtos::{
    CreateMessageDTO, MessageDTO, MessagePageDTO, MessagesQuery, SendMessageRequest, UserDTO,
};
use crate::entities::{MessageKind, User};
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user), fields(room_id = %room_id, user_id = %current_user.user_id))]
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(params): Query<MessagesQuery>,
    Extension(current_user): Extension<User>, // membership checked by middleware
) -> Result<Json<MessagePageDTO>, AppError> {
    debug!("Fetching room messages");
    let limit = params.page_size();

    // Newest-first from the store, then reversed so clients render
    // oldest-first. One extra row is fetched to tell "exactly one page
    // left" apart from "more history behind this page": a room holding
    // exactly `limit` messages must come back with a null cursor.
    let mut messages = state
        .msg
        .find_page(&room_id, params.cursor.as_deref(), limit + 1)
        .await?;

    let next_cursor = if messages.len() as i64 > limit {
        messages.truncate(limit as usize);
        messages.last().map(|m| m.message_id.clone())
    } else {
        None
    };

    messages.reverse();

    // Resolve each distinct sender once.
    let mut senders: HashMap<String, UserDTO> = HashMap::new();
    for message in &messages {
        if !senders.contains_key(&message.sender_id) {
            let sender = state.user.read(&message.sender_id).await?.ok_or_else(|| {
                AppError::internal_server_error("Message sender no longer exists")
            })?;
            senders.insert(message.sender_id.clone(), UserDTO::from(sender));
        }
    }

    let messages_dto: Vec<MessageDTO> = messages
        .into_iter()
        .map(|m| {
            let sender = senders[&m.sender_id].clone();
            MessageDTO {
                id: m.message_id,
                room_id: m.room_id,
                sender_id: m.sender_id,
                content: m.content,
                message_type: m.message_type,
                created_at: m.created_at,
                updated_at: m.updated_at,
                sender,
                client_ref: m.client_ref,
            }
        })
        .collect();

    info!("Retrieved {} messages for room", messages_dto.len());
    Ok(Json(MessagePageDTO {
        messages: messages_dto,
        next_cursor,
    }))
}

#[instrument(skip(state, current_user, body), fields(room_id = %room_id, user_id = %current_user.user_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Extension(current_user): Extension<User>, // membership checked by middleware
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<MessageDTO>, AppError> {
    debug!("Sending message");
    body.validate()?;

    let now = Utc::now();
    let message = state
        .msg
        .create(&CreateMessageDTO {
            room_id: room_id.clone(),
            sender_id: current_user.user_id.clone(),
            content: body.content,
            message_type: MessageKind::Text,
            client_ref: body.client_ref,
            created_at: now,
        })
        .await?;

    // Keep the room list sorted by recency and its preview fresh.
    state
        .room
        .touch_last_message(&room_id, &message.message_id, &now)
        .await?;

    let dto = MessageDTO::from_message(message, current_user);

    // Best-effort fan-out: the message is already durable, so a transport
    // hiccup must not fail the send. Participants that miss the event pick
    // the message up on their next room-list refresh.
    match serde_json::to_value(&dto) {
        Ok(payload) => {
            state
                .broker
                .publish(&room_channel(&room_id), delivery::EVENT_NEW_MESSAGE, payload.clone());
            state.broker.publish(
                &room_channel(&room_id),
                delivery::EVENT_ROOM_UPDATED,
                serde_json::json!({
                    "id": room_id,
                    "updatedAt": now,
                    "lastMessage": payload,
                }),
            );
        }
        Err(e) => warn!("Failed to serialize new-message event: {}", e),
    }

    info!("Message {} sent to room {}", dto.id, room_id);
    Ok(Json(dto))
}
