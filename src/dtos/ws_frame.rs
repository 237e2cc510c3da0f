//! WebSocket client frames
//!
//! Tagged union, serialized by serde as:
//! `{ "type": "Subscribe", "data": { "channel": "chat-..." } }`

use serde::{Deserialize, Serialize};

/// Frames a connected client may send over the socket.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum ClientFrame {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}
