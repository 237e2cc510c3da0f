//! Unread tracking - per-room badge counts, purely client-local
//!
//! Counters live only for the duration of the session (a reload or device
//! switch resets them); nothing is persisted server-side. The count is
//! deliberately approximate: events that arrive while subscribed are
//! counted, events missed while offline are not.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Default)]
pub struct UnreadTracker {
    /// Last-read timestamp per room; set when the room is selected.
    last_read: HashMap<String, DateTime<Utc>>,
    counts: HashMap<String, u32>,
    selected: Option<String>,
}

impl UnreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a room as the one on screen: stamps it read now and zeroes
    /// its counter. Events for the selected room never count as unread.
    pub fn select_room(&mut self, room_id: &str, now: DateTime<Utc>) {
        self.selected = Some(room_id.to_string());
        self.last_read.insert(room_id.to_string(), now);
        self.counts.insert(room_id.to_string(), 0);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Handles a new-message event: increments the room's counter only if
    /// the room is not selected and the message is strictly newer than the
    /// room's last-read stamp.
    pub fn observe_message(&mut self, room_id: &str, created_at: DateTime<Utc>) {
        if self.selected.as_deref() == Some(room_id) {
            return;
        }
        if let Some(last_read) = self.last_read.get(room_id) {
            if created_at <= *last_read {
                return;
            }
        }
        *self.counts.entry(room_id.to_string()).or_insert(0) += 1;
    }

    /// Unread count for a room. The selected room always reads zero.
    pub fn count(&self, room_id: &str) -> u32 {
        if self.selected.as_deref() == Some(room_id) {
            return 0;
        }
        self.counts.get(room_id).copied().unwrap_or(0)
    }
}
