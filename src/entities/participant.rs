//! Participant entity - membership link between a user and a room
//!
//! Created at room-creation time, immutable afterwards. The (user, room)
//! pair is the primary key, so a user cannot join the same room twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Participant {
    pub user_id: String,
    pub room_id: String,
    pub joined_at: DateTime<Utc>,
}
