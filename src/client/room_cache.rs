//! Room list cache - the client's live view of "my rooms"
//!
//! Populated from GET /rooms, then kept current by room-created and
//! new-message events. Rooms stay ordered most-recently-active first.

use crate::dtos::{MessageDTO, RoomDTO};
use tracing::debug;

#[derive(Default)]
pub struct RoomCache {
    rooms: Vec<RoomDTO>,
}

impl RoomCache {
    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    /// Replaces the whole cache with a fresh room list (full refresh).
    pub fn set_rooms(&mut self, rooms: Vec<RoomDTO>) {
        self.rooms = rooms;
    }

    /// Handles a room-created event. Idempotent by room id: the same room
    /// arrives twice when the client is subscribed to both its personal
    /// and its company channel, and the second delivery must be a no-op.
    pub fn apply_room_created(&mut self, room: RoomDTO) {
        if self.rooms.iter().any(|r| r.id == room.id) {
            debug!(room_id = %room.id, "Duplicate room-created event ignored");
            return;
        }
        self.rooms.insert(0, room);
    }

    /// Handles a new-message event: refreshes the room's preview and
    /// recency, and moves it to the front of the list. Unknown rooms are
    /// ignored; the next full refresh will bring them in.
    pub fn apply_new_message(&mut self, message: &MessageDTO) {
        let Some(position) = self.rooms.iter().position(|r| r.id == message.room_id) else {
            debug!(room_id = %message.room_id, "Message for uncached room ignored");
            return;
        };

        let mut room = self.rooms.remove(position);
        room.updated_at = message.created_at;
        room.last_message = Some(message.clone());
        self.rooms.insert(0, room);
    }

    pub fn rooms(&self) -> &[RoomDTO] {
        &self.rooms
    }

    pub fn get(&self, room_id: &str) -> Option<&RoomDTO> {
        self.rooms.iter().find(|r| r.id == room_id)
    }
}
