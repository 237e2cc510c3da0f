//! UserRepository - read-only access to provisioned users

use super::Read;
use crate::entities::User;
use sqlx::{Error, SqlitePool};

// USER REPO
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Fetch several users by id, preserving the order of `ids`.
    /// Ids that match no row are skipped.
    pub async fn read_many_ordered(&self, ids: &[String]) -> Result<Vec<User>, Error> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.read(id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}

impl Read<User, String> for UserRepository {
    async fn read(&self, id: &String) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, image, role, company_id
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}
