//! Core Module - infrastructural components
//!
//! - Identity resolution and membership middleware
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports to simplify imports
pub use auth::{authentication_middleware, decode_token, encode_token, room_membership_middleware, Claims};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
