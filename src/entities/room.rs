//! Room entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Room {
    pub room_id: String,
    /// Display name. Always set for group rooms; direct rooms leave it NULL
    /// and derive one from the other participant at render time.
    pub name: Option<String>,
    pub is_group: bool,
    pub company_id: String,
    /// Cached pointer to the most recent message, for list previews.
    pub last_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every message so the room list sorts by recency.
    pub updated_at: DateTime<Utc>,
}
