//! Delivery module - pub/sub fan-out of real-time events
//!
//! Channels are purely routing keys (`chat-{roomId}`, `user-{userId}`,
//! `company-{companyId}`); the broker delivers named events to every
//! current subscriber of a channel. Publishing is fire-and-forget: the
//! data mutation has already been persisted by the time anything is
//! published, so a delivery failure never fails the enclosing request.

pub mod broker;
pub mod channels;

// Re-exports to simplify imports
pub use broker::{ChannelBroker, ChannelEvent};
pub use channels::{authorize_subscription, company_channel, room_channel, user_channel, Channel};

/// Event names carried on the channels. The exact strings are part of the
/// wire contract with clients.
pub const EVENT_NEW_MESSAGE: &str = "new-message";
pub const EVENT_ROOM_CREATED: &str = "room-created";
pub const EVENT_ROOM_UPDATED: &str = "room-updated";
pub const EVENT_USER_TYPING: &str = "user-typing";
pub const EVENT_USER_STOPPED_TYPING: &str = "user-stopped-typing";

/// Capacity of each per-channel broadcast buffer. A subscriber that lags
/// further behind than this misses events and resyncs on its next full
/// refresh.
pub const BROADCAST_CHANNEL_CAPACITY: usize = 256;
