//! ParticipantRepository - room membership records

use super::{Create, Read};
use crate::entities::Participant;
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

/// DTO for inserting a membership record.
#[derive(Debug, Clone)]
pub struct CreateParticipantDTO {
    pub user_id: String,
    pub room_id: String,
    pub joined_at: DateTime<Utc>,
}

// PARTICIPANT REPO
pub struct ParticipantRepository {
    connection_pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts the whole participant set of a new room in one transaction,
    /// so a room never ends up half-populated.
    pub async fn create_many(&self, records: &[CreateParticipantDTO]) -> Result<(), Error> {
        let mut tx = self.connection_pool.begin().await?;

        for record in records {
            sqlx::query(
                "INSERT INTO participants (user_id, room_id, joined_at) VALUES (?, ?, ?)",
            )
            .bind(&record.user_id)
            .bind(&record.room_id)
            .bind(record.joined_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Members of a room ordered by join time (room creator first, since
    /// the creator's record is inserted first within the same timestamp).
    pub async fn find_many_by_room_id(&self, room_id: &str) -> Result<Vec<Participant>, Error> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT user_id, room_id, joined_at
            FROM participants
            WHERE room_id = ?
            ORDER BY joined_at ASC, rowid ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(participants)
    }

    /// Membership check used by the authorization paths.
    pub async fn is_member(&self, user_id: &str, room_id: &str) -> Result<bool, Error> {
        Ok(self.read(&(user_id.to_string(), room_id.to_string())).await?.is_some())
    }
}

impl Create<Participant, CreateParticipantDTO> for ParticipantRepository {
    async fn create(&self, data: &CreateParticipantDTO) -> Result<Participant, Error> {
        sqlx::query(
            "INSERT INTO participants (user_id, room_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(&data.user_id)
        .bind(&data.room_id)
        .bind(data.joined_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Participant {
            user_id: data.user_id.clone(),
            room_id: data.room_id.clone(),
            joined_at: data.joined_at,
        })
    }
}

impl Read<Participant, (String, String)> for ParticipantRepository {
    /// Primary key is the (user_id, room_id) pair.
    async fn read(&self, id: &(String, String)) -> Result<Option<Participant>, Error> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            SELECT user_id, room_id, joined_at
            FROM participants
            WHERE user_id = ? AND room_id = ?
            "#,
        )
        .bind(&id.0)
        .bind(&id.1)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(participant)
    }
}
