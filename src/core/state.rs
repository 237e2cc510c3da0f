//! Application state shared across routes and middleware

use crate::delivery::ChannelBroker;
use crate::repositories::{
    MessageRepository, ParticipantRepository, RoomRepository, UserRepository,
};
use sqlx::SqlitePool;

pub struct AppState {
    /// Repository for users (read-only in the chat core)
    pub user: UserRepository,

    /// Repository for rooms
    pub room: RoomRepository,

    /// Repository for room membership records
    pub participant: ParticipantRepository,

    /// Repository for messages
    pub msg: MessageRepository,

    /// Secret for session bearer tokens
    pub jwt_secret: String,

    /// Direct-room reuse policy (see Config::reuse_direct_rooms)
    pub reuse_direct_rooms: bool,

    /// In-process pub/sub transport for real-time events
    pub broker: ChannelBroker,
}

impl AppState {
    /// Creates an AppState with every repository bound to the given pool.
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            room: RoomRepository::new(pool.clone()),
            participant: ParticipantRepository::new(pool.clone()),
            msg: MessageRepository::new(pool),
            jwt_secret,
            reuse_direct_rooms: false,
            broker: ChannelBroker::new(),
        }
    }

    pub fn with_reuse_direct_rooms(mut self, reuse: bool) -> Self {
        self.reuse_direct_rooms = reuse;
        self
    }
}
