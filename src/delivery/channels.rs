//! Channel naming scheme and subscription authorization
//!
//! Channel names are the only addressing and authorization boundary of the
//! transport, so the scheme is fixed: `chat-{roomId}`, `user-{userId}`,
//! `company-{companyId}`.

use crate::core::{AppError, AppState};
use crate::entities::User;
use tracing::{debug, instrument, warn};

pub fn room_channel(room_id: &str) -> String {
    format!("chat-{room_id}")
}

pub fn user_channel(user_id: &str) -> String {
    format!("user-{user_id}")
}

pub fn company_channel(company_id: &str) -> String {
    format!("company-{company_id}")
}

/// A channel name parsed into its addressing class.
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    Room(String),
    User(String),
    Company(String),
}

impl Channel {
    /// Parses a raw channel name. Unknown prefixes yield `None` and are
    /// treated as unauthorized by the subscribe path.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(room_id) = name.strip_prefix("chat-") {
            (!room_id.is_empty()).then(|| Channel::Room(room_id.to_string()))
        } else if let Some(user_id) = name.strip_prefix("user-") {
            (!user_id.is_empty()).then(|| Channel::User(user_id.to_string()))
        } else if let Some(company_id) = name.strip_prefix("company-") {
            (!company_id.is_empty()).then(|| Channel::Company(company_id.to_string()))
        } else {
            None
        }
    }
}

/// Validates that `user` may subscribe to `channel_name`: their own user
/// channel, their own company channel, or a room they participate in.
#[instrument(skip(state, user), fields(user_id = %user.user_id, channel = %channel_name))]
pub async fn authorize_subscription(
    state: &AppState,
    user: &User,
    channel_name: &str,
) -> Result<(), AppError> {
    let channel = Channel::parse(channel_name).ok_or_else(|| {
        warn!("Unrecognized channel name");
        AppError::forbidden("Unrecognized channel name")
    })?;

    match channel {
        Channel::User(user_id) => {
            if user_id != user.user_id {
                warn!("Attempted subscription to another user's channel");
                return Err(AppError::forbidden("Not your user channel"));
            }
        }
        Channel::Company(company_id) => {
            if user.company_id.as_deref() != Some(company_id.as_str()) {
                warn!("Attempted subscription to another company's channel");
                return Err(AppError::forbidden("Not your company channel"));
            }
        }
        Channel::Room(room_id) => {
            let is_member = state
                .participant
                .is_member(&user.user_id, &room_id)
                .await?;
            if !is_member {
                warn!("Attempted subscription to a room the user is not in");
                return Err(AppError::forbidden("You are not a member of this room"));
            }
        }
    }

    debug!("Subscription authorized");
    Ok(())
}
