//! Optimistic reconciliation engine
//!
//! Makes the sender's own UI feel instantaneous: a placeholder message is
//! shown the moment the user hits send, then reconciled with the confirmed
//! message when the new-message event echoes back, or rolled back if the
//! send request fails.
//!
//! Matching order on confirmation: message id (duplicate deliveries),
//! then correlation id (`client_ref`), then the temp-id + identical-content
//! heuristic for sends without a correlation id. The correlation id is
//! what disambiguates two in-flight sends of the same text.

use crate::dtos::{MessageDTO, UserDTO};
use chrono::Utc;
use uuid::Uuid;

/// Prefix of placeholder ids; nothing persisted ever carries it.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Error returned when a second send is started while one is in flight.
#[derive(Debug, PartialEq)]
pub struct SendInFlight;

/// The local message list of one room, with optimistic-send bookkeeping.
pub struct OptimisticTimeline {
    messages: Vec<MessageDTO>,
    /// Pre-send copy of the list, kept only while a send is in flight so a
    /// failed request can roll back.
    snapshot: Option<Vec<MessageDTO>>,
}

impl OptimisticTimeline {
    /// Starts from a fetched history page (oldest first).
    pub fn new(history: Vec<MessageDTO>) -> Self {
        Self {
            messages: history,
            snapshot: None,
        }
    }

    /// Builds the transient placeholder for an outgoing message. The
    /// `client_ref` is echoed back by the server in the confirmed event.
    pub fn placeholder_for(room_id: &str, sender: &UserDTO, content: &str) -> MessageDTO {
        let now = Utc::now();
        MessageDTO {
            id: format!("{TEMP_ID_PREFIX}{}", Uuid::now_v7()),
            room_id: room_id.to_string(),
            sender_id: sender.id.clone(),
            content: content.to_string(),
            message_type: crate::entities::MessageKind::Text,
            created_at: now,
            updated_at: now,
            sender: sender.clone(),
            client_ref: Some(Uuid::now_v7().to_string()),
        }
    }

    /// Inserts the placeholder at the tail and snapshots the list for
    /// rollback. At most one send may be in flight per room.
    ///
    /// If the confirmation already arrived (the event can beat the local
    /// insert), the placeholder is dropped instead of inserted, guarded by
    /// correlation id first and the content heuristic second.
    pub fn begin_send(&mut self, placeholder: MessageDTO) -> Result<(), SendInFlight> {
        if self.snapshot.is_some() {
            return Err(SendInFlight);
        }

        if self.already_confirmed(&placeholder) {
            return Ok(());
        }

        self.snapshot = Some(self.messages.clone());
        self.messages.push(placeholder);
        Ok(())
    }

    /// Handles the confirmed message from the new-message event (including
    /// the echo to the sender). Exactly-once by construction: a message id
    /// already present is a duplicate delivery and is ignored.
    pub fn confirm(&mut self, confirmed: MessageDTO) {
        if self.messages.iter().any(|m| m.id == confirmed.id) {
            return;
        }

        match self.matching_placeholder(&confirmed) {
            Some(position) => {
                // Replace in place, preserving the position the
                // placeholder held.
                self.messages[position] = confirmed;
                self.snapshot = None;
            }
            None => {
                // No placeholder (another sender, or the event won the
                // race): append in arrival order.
                self.messages.push(confirmed);
            }
        }
    }

    /// Rolls the list back to its pre-send state after a failed request.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.messages = snapshot;
        }
    }

    /// True while a send awaits confirmation or rollback.
    pub fn send_in_flight(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn messages(&self) -> &[MessageDTO] {
        &self.messages
    }

    fn matching_placeholder(&self, confirmed: &MessageDTO) -> Option<usize> {
        self.messages.iter().position(|m| {
            if !m.id.starts_with(TEMP_ID_PREFIX) {
                return false;
            }
            match (&m.client_ref, &confirmed.client_ref) {
                (Some(ours), Some(theirs)) => ours == theirs,
                // Legacy heuristic for sends without a correlation id.
                _ => m.content == confirmed.content && m.sender_id == confirmed.sender_id,
            }
        })
    }

    /// Whether a confirmed message matching this placeholder is already in
    /// the list (the event arrived before the placeholder insert).
    fn already_confirmed(&self, placeholder: &MessageDTO) -> bool {
        self.messages.iter().any(|m| {
            if m.id.starts_with(TEMP_ID_PREFIX) {
                return false;
            }
            match (&placeholder.client_ref, &m.client_ref) {
                (Some(ours), Some(theirs)) => ours == theirs,
                _ => m.content == placeholder.content && m.sender_id == placeholder.sender_id,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MessageKind;

    fn sender() -> UserDTO {
        UserDTO {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            image: None,
            role: "EMPLOYEE".to_string(),
        }
    }

    fn confirmed_from(placeholder: &MessageDTO, id: &str) -> MessageDTO {
        MessageDTO {
            id: id.to_string(),
            client_ref: placeholder.client_ref.clone(),
            ..placeholder.clone()
        }
    }

    fn foreign_message(id: &str, content: &str) -> MessageDTO {
        MessageDTO {
            id: id.to_string(),
            room_id: "r1".to_string(),
            sender_id: "u2".to_string(),
            content: content.to_string(),
            message_type: MessageKind::Text,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sender: UserDTO {
                id: "u2".to_string(),
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                image: None,
                role: "EMPLOYEE".to_string(),
            },
            client_ref: None,
        }
    }

    #[test]
    fn send_round_trip_yields_exactly_one_message() {
        let mut timeline = OptimisticTimeline::new(vec![]);
        let placeholder = OptimisticTimeline::placeholder_for("r1", &sender(), "hi");

        timeline.begin_send(placeholder.clone()).unwrap();
        assert_eq!(timeline.messages().len(), 1);
        assert!(timeline.send_in_flight());

        timeline.confirm(confirmed_from(&placeholder, "m1"));

        let with_content: Vec<_> = timeline
            .messages()
            .iter()
            .filter(|m| m.content == "hi")
            .collect();
        assert_eq!(with_content.len(), 1, "never two, never zero");
        assert_eq!(with_content[0].id, "m1");
        assert!(!timeline.send_in_flight());
    }

    #[test]
    fn confirmation_preserves_placeholder_position() {
        let mut timeline = OptimisticTimeline::new(vec![foreign_message("m0", "earlier")]);
        let placeholder = OptimisticTimeline::placeholder_for("r1", &sender(), "mine");
        timeline.begin_send(placeholder.clone()).unwrap();

        // A foreign message lands while ours is in flight.
        timeline.confirm(foreign_message("m1", "interleaved"));
        timeline.confirm(confirmed_from(&placeholder, "m2"));

        let ids: Vec<&str> = timeline.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m0", "m2", "m1"]);
    }

    #[test]
    fn duplicate_confirmation_is_ignored() {
        let mut timeline = OptimisticTimeline::new(vec![]);
        let placeholder = OptimisticTimeline::placeholder_for("r1", &sender(), "hi");
        timeline.begin_send(placeholder.clone()).unwrap();

        timeline.confirm(confirmed_from(&placeholder, "m1"));
        timeline.confirm(confirmed_from(&placeholder, "m1"));

        assert_eq!(timeline.messages().len(), 1);
    }

    #[test]
    fn identical_content_twice_disambiguated_by_client_ref() {
        let mut timeline = OptimisticTimeline::new(vec![]);

        let first = OptimisticTimeline::placeholder_for("r1", &sender(), "same text");
        timeline.begin_send(first.clone()).unwrap();
        timeline.confirm(confirmed_from(&first, "m1"));

        let second = OptimisticTimeline::placeholder_for("r1", &sender(), "same text");
        timeline.begin_send(second.clone()).unwrap();
        timeline.confirm(confirmed_from(&second, "m2"));

        let ids: Vec<&str> = timeline.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn rollback_restores_pre_send_list() {
        let mut timeline = OptimisticTimeline::new(vec![foreign_message("m0", "hello")]);
        let placeholder = OptimisticTimeline::placeholder_for("r1", &sender(), "doomed");
        timeline.begin_send(placeholder).unwrap();
        assert_eq!(timeline.messages().len(), 2);

        timeline.rollback();

        assert_eq!(timeline.messages().len(), 1);
        assert_eq!(timeline.messages()[0].id, "m0");
        assert!(!timeline.send_in_flight());
    }

    #[test]
    fn second_send_while_in_flight_is_rejected() {
        let mut timeline = OptimisticTimeline::new(vec![]);
        let first = OptimisticTimeline::placeholder_for("r1", &sender(), "one");
        let second = OptimisticTimeline::placeholder_for("r1", &sender(), "two");

        timeline.begin_send(first).unwrap();
        assert_eq!(timeline.begin_send(second), Err(SendInFlight));
    }

    #[test]
    fn confirmation_racing_ahead_of_placeholder_does_not_duplicate() {
        let mut timeline = OptimisticTimeline::new(vec![]);
        let placeholder = OptimisticTimeline::placeholder_for("r1", &sender(), "fast");

        // The event beat the local insert.
        timeline.confirm(confirmed_from(&placeholder, "m1"));
        timeline.begin_send(placeholder).unwrap();

        assert_eq!(timeline.messages().len(), 1);
        assert_eq!(timeline.messages()[0].id, "m1");
    }

    #[test]
    fn foreign_messages_append_in_arrival_order() {
        let mut timeline = OptimisticTimeline::new(vec![]);
        timeline.confirm(foreign_message("m1", "a"));
        timeline.confirm(foreign_message("m2", "b"));

        let ids: Vec<&str> = timeline.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }
}
