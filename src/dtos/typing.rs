//! Typing indicator DTOs

use serde::{Deserialize, Serialize};

/// Request body for POST /rooms/{room_id}/typing.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    pub is_typing: bool,
}

/// Payload of user-typing / user-stopped-typing events.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TypingEventDTO {
    pub user_id: String,
    pub user_name: String,
    pub is_typing: bool,
}
