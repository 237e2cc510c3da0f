//! User entity
//!
//! Users are provisioned by the surrounding identity provider; the chat core
//! only reads them to resolve senders, participants and the owning tenant.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    /// Tenant the user belongs to. Required for creating rooms.
    pub company_id: Option<String>,
}
