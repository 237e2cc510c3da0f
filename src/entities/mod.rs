//! Entities module - domain entities persisted in the database
//!
//! Each entity corresponds to one table of the schema in `migrations/`.

pub mod enums;
pub mod message;
pub mod participant;
pub mod room;
pub mod user;

// Re-exports to simplify imports
pub use enums::MessageKind;
pub use message::Message;
pub use participant::Participant;
pub use room::Room;
pub use user::User;
