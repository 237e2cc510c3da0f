//! ChannelBroker - in-process pub/sub transport
//!
//! One tokio broadcast channel per channel name, created lazily on first
//! subscribe and dropped again once the last receiver is gone.

use crate::delivery::BROADCAST_CHANNEL_CAPACITY;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::{debug, info, instrument, warn};

/// Envelope delivered to subscribers and forwarded verbatim over the
/// WebSocket: `{ "channel": ..., "event": ..., "data": ... }`.
#[derive(Serialize, Debug, Clone)]
pub struct ChannelEvent {
    pub channel: String,
    pub event: String,
    pub data: serde_json::Value,
}

pub struct ChannelBroker {
    /// Retrieve the tx head of a channel's broadcast by channel name.
    channels: DashMap<String, Sender<Arc<ChannelEvent>>>,
}

impl ChannelBroker {
    pub fn new() -> Self {
        ChannelBroker {
            channels: DashMap::new(),
        }
    }

    #[instrument(skip(self))]
    pub fn subscribe(&self, channel: &str) -> Receiver<Arc<ChannelEvent>> {
        match self.channels.get(channel) {
            // first subscriber creates the broadcast channel
            None => {
                info!("Creating broadcast channel");
                // Arc<ChannelEvent> so each receiver shares the payload
                // instead of cloning it.
                let (tx, rx) = broadcast::channel::<Arc<ChannelEvent>>(BROADCAST_CHANNEL_CAPACITY);
                self.channels.insert(channel.to_string(), tx);
                rx
            }
            // subscribing to an existing channel == taking a new rx head
            Some(entry) => {
                debug!("Subscribing to existing broadcast channel");
                entry.value().subscribe()
            }
        }
    }

    /// Publish a named event on a channel. Best-effort by contract: a
    /// channel nobody listens to is a normal outcome, not an error, and the
    /// caller gets back only the number of receivers reached.
    #[instrument(skip(self, data))]
    pub fn publish(&self, channel: &str, event: &str, data: serde_json::Value) -> usize {
        let payload = Arc::new(ChannelEvent {
            channel: channel.to_string(),
            event: event.to_string(),
            data,
        });

        if let Some(entry) = self.channels.get(channel) {
            match entry.send(payload) {
                Ok(n) => {
                    debug!(receivers = n, "Event broadcast to receivers");
                    n
                }
                Err(_) => {
                    warn!("No active receivers, removing channel");
                    drop(entry); // release the map guard before removal
                    self.channels.remove(channel);
                    0
                }
            }
        } else {
            debug!("No subscribers on channel, event dropped");
            0
        }
    }

    /// Number of channels currently held open by at least one subscriber.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for ChannelBroker {
    fn default() -> Self {
        Self::new()
    }
}
