//! MessageRepository - append-only message log with cursor pagination

use super::{Create, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use sqlx::{Error, SqlitePool};
use uuid::Uuid;

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Get one page of a room's history, walking backward from the most
    /// recent message.
    ///
    /// * `before_id` - Exclusive upper bound (a message id). `None` starts
    ///   from the newest message.
    /// * `limit` - Maximum number of messages to return.
    ///
    /// Message ids are UUIDv7 strings, so `message_id < ?` is a pure index
    /// walk in creation order. Results are newest-first; the service layer
    /// reverses them for presentation.
    pub async fn find_page(
        &self,
        room_id: &str,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let messages = if let Some(before) = before_id {
            sqlx::query_as::<_, Message>(
                r#"
                SELECT message_id, room_id, sender_id, content, message_type,
                       edited, client_ref, created_at, updated_at
                FROM messages
                WHERE room_id = ? AND message_id < ?
                ORDER BY message_id DESC
                LIMIT ?
                "#,
            )
            .bind(room_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await?
        } else {
            sqlx::query_as::<_, Message>(
                r#"
                SELECT message_id, room_id, sender_id, content, message_type,
                       edited, client_ref, created_at, updated_at
                FROM messages
                WHERE room_id = ?
                ORDER BY message_id DESC
                LIMIT ?
                "#,
            )
            .bind(room_id)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await?
        };

        Ok(messages)
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let message_id = Uuid::now_v7().to_string();

        sqlx::query(
            r#"
            INSERT INTO messages
                (message_id, room_id, sender_id, content, message_type,
                 edited, client_ref, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(&message_id)
        .bind(&data.room_id)
        .bind(&data.sender_id)
        .bind(&data.content)
        .bind(&data.message_type)
        .bind(&data.client_ref)
        .bind(data.created_at)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Message {
            message_id,
            room_id: data.room_id.clone(),
            sender_id: data.sender_id.clone(),
            content: data.content.clone(),
            message_type: data.message_type.clone(),
            edited: false,
            client_ref: data.client_ref.clone(),
            created_at: data.created_at,
            updated_at: data.created_at,
        })
    }
}

impl Read<Message, String> for MessageRepository {
    async fn read(&self, id: &String) -> Result<Option<Message>, Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT message_id, room_id, sender_id, content, message_type,
                   edited, client_ref, created_at, updated_at
            FROM messages
            WHERE message_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }
}
