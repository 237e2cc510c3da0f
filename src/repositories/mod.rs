//! Repositories module - database access, one repository per entity
//!
//! Queries are runtime-checked (`sqlx::query_as::<_, T>`) against SQLite,
//! so the crate builds and tests without a provisioned database server.

pub mod message;
pub mod participant;
pub mod room;
pub mod traits;
pub mod user;

// Re-exports to simplify imports
pub use traits::{Create, Read};

pub use message::MessageRepository;
pub use participant::ParticipantRepository;
pub use room::RoomRepository;
pub use user::UserRepository;
