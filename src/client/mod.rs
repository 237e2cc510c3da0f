//! Client module - the state a connected client keeps between events
//!
//! These components own all client-local chat state: the room list cache,
//! per-room unread counters and the optimistic send timeline. They are
//! plain state machines with no I/O, constructed once per client session
//! and fed HTTP responses and channel events; the embedding UI renders
//! from their accessors. Every event handler is idempotent by id, because
//! the transport may deliver the same event twice (a client is typically
//! subscribed to both its personal and its tenant channel).

pub mod outbox;
pub mod room_cache;
pub mod unread;

// Re-exports to simplify imports
pub use outbox::OptimisticTimeline;
pub use room_cache::RoomCache;
pub use unread::UnreadTracker;
