//! Message entity

use super::enums::MessageKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    /// UUIDv7, so ids sort in creation order and double as the pagination
    /// cursor.
    pub message_id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: MessageKind,
    /// Schema-present for future edit support; nothing sets it today.
    pub edited: bool,
    /// Client-generated correlation id, echoed back in the new-message
    /// event so the sender can match the confirmation to its placeholder.
    pub client_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
