//! DTOs module - Data Transfer Objects
//!
//! Wire shapes exchanged with clients. Field names are camelCase on the
//! wire (the external contract), snake_case internally.

pub mod message;
pub mod query;
pub mod room;
pub mod typing;
pub mod user;
pub mod ws_frame;

// Re-exports to simplify imports
pub use message::{CreateMessageDTO, MessageDTO, MessagePageDTO, SendMessageRequest};
pub use query::MessagesQuery;
pub use room::{CreateRoomDTO, CreateRoomRequest, RoomDTO};
pub use typing::{TypingEventDTO, TypingRequest};
pub use user::UserDTO;
pub use ws_frame::ClientFrame;
