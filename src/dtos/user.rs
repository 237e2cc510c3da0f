//! User DTOs

use crate::entities::User;
use serde::{Deserialize, Serialize};

/// Sender shape embedded in messages and room participant lists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            name: value.name,
            email: value.email,
            image: value.image,
            role: value.role,
        }
    }
}
