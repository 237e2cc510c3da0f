//! Message DTOs

use crate::dtos::UserDTO;
use crate::entities::{Message, MessageKind, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wire shape of a message, sender embedded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: MessageKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sender: UserDTO,
    /// Echo of the sender-supplied correlation id, absent for messages sent
    /// without one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub client_ref: Option<String>,
}

impl MessageDTO {
    /// Builds the wire shape from a persisted message and its sender row.
    pub fn from_message(message: Message, sender: User) -> Self {
        Self {
            id: message.message_id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content: message.content,
            message_type: message.message_type,
            created_at: message.created_at,
            updated_at: message.updated_at,
            sender: UserDTO::from(sender),
            client_ref: message.client_ref,
        }
    }
}

/// Request body for POST /rooms/{room_id}/messages.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message content must be between 1 and 5000 characters"
    ))]
    pub content: String,
    #[serde(default)]
    pub client_ref: Option<String>,
}

/// Internal DTO handed to the repository (without message_id).
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: MessageKind,
    pub client_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One page of history, oldest first, with the cursor for the next
/// (older) page.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessagePageDTO {
    pub messages: Vec<MessageDTO>,
    pub next_cursor: Option<String>,
}
