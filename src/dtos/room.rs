//! Room DTOs

use crate::dtos::{MessageDTO, UserDTO};
use crate::entities::Room;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wire shape of a room for list/detail responses and room-created events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomDTO {
    pub id: String,
    pub name: Option<String>,
    pub is_group: bool,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Participants ordered by join time, creator first.
    pub participants: Vec<UserDTO>,
    /// Most recent message, for list previews.
    pub last_message: Option<MessageDTO>,
}

impl RoomDTO {
    pub fn from_room(room: Room, participants: Vec<UserDTO>, last_message: Option<MessageDTO>) -> Self {
        Self {
            id: room.room_id,
            name: room.name,
            is_group: room.is_group,
            company_id: room.company_id,
            created_at: room.created_at,
            updated_at: room.updated_at,
            participants,
            last_message,
        }
    }
}

/// Request body for POST /rooms.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Internal DTO handed to the repository (without room_id).
#[derive(Debug, Clone)]
pub struct CreateRoomDTO {
    pub name: Option<String>,
    pub is_group: bool,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
}
