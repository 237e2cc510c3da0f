//! RoomRepository - room persistence and recency bookkeeping

use super::{Create, Read};
use crate::dtos::CreateRoomDTO;
use crate::entities::Room;
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};
use tracing::debug;
use uuid::Uuid;

// ROOM REPO
pub struct RoomRepository {
    connection_pool: SqlitePool,
}

impl RoomRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// All rooms the user participates in, most recently updated first.
    pub async fn find_many_by_user_id(&self, user_id: &str) -> Result<Vec<Room>, Error> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT r.room_id, r.name, r.is_group, r.company_id,
                   r.last_message_id, r.created_at, r.updated_at
            FROM rooms r
            INNER JOIN participants p ON p.room_id = r.room_id
            WHERE p.user_id = ?
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rooms)
    }

    /// Looks for an existing direct (non-group) room shared by exactly the
    /// two given users. Used only when the direct-room reuse policy is on.
    pub async fn find_direct_room_between(
        &self,
        user1_id: &str,
        user2_id: &str,
    ) -> Result<Option<Room>, Error> {
        debug!("Finding direct room between two users");
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT r.room_id, r.name, r.is_group, r.company_id,
                   r.last_message_id, r.created_at, r.updated_at
            FROM rooms r
            INNER JOIN participants p ON p.room_id = r.room_id
            WHERE r.is_group = 0
              AND p.user_id IN (?, ?)
            GROUP BY r.room_id
            HAVING COUNT(DISTINCT p.user_id) = 2
            "#,
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(room)
    }

    /// Records that a message landed in the room: bumps `updated_at` and
    /// repoints the cached last-message preview.
    pub async fn touch_last_message(
        &self,
        room_id: &str,
        message_id: &str,
        at: &DateTime<Utc>,
    ) -> Result<(), Error> {
        sqlx::query(
            "UPDATE rooms SET last_message_id = ?, updated_at = ? WHERE room_id = ?",
        )
        .bind(message_id)
        .bind(at)
        .bind(room_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }
}

impl Create<Room, CreateRoomDTO> for RoomRepository {
    async fn create(&self, data: &CreateRoomDTO) -> Result<Room, Error> {
        let room_id = Uuid::now_v7().to_string();

        sqlx::query(
            r#"
            INSERT INTO rooms (room_id, name, is_group, company_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&room_id)
        .bind(&data.name)
        .bind(data.is_group)
        .bind(&data.company_id)
        .bind(data.created_at)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Room {
            room_id,
            name: data.name.clone(),
            is_group: data.is_group,
            company_id: data.company_id.clone(),
            last_message_id: None,
            created_at: data.created_at,
            updated_at: data.created_at,
        })
    }
}

impl Read<Room, String> for RoomRepository {
    async fn read(&self, id: &String) -> Result<Option<Room>, Error> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT room_id, name, is_group, company_id,
                   last_message_id, created_at, updated_at
            FROM rooms
            WHERE room_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(room)
    }
}
