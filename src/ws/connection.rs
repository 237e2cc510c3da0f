//! WebSocket connection management
//!
//! The socket is split in two tasks: a listen task that parses client
//! frames and authorizes subscriptions, and a write task that fans in all
//! subscribed channels through a StreamMap and forwards events as JSON.

use crate::core::AppState;
use crate::delivery::{authorize_subscription, company_channel, user_channel, ChannelEvent};
use crate::dtos::ClientFrame;
use crate::entities::User;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_stream::StreamMap;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, instrument, warn};

/// Commands flowing from the listen task to the write task.
pub enum SocketCommand {
    /// Subscription already authorized, attach the channel stream.
    Attach(String),
    /// Drop the channel stream, if present.
    Detach(String),
    /// Subscription was denied, tell the client.
    Reject(String),
    Shutdown,
}

/// Error frame sent to the client when a subscribe is denied.
#[derive(Serialize)]
struct SubscriptionError<'a> {
    channel: &'a str,
    event: &'a str,
}

#[instrument(skip(ws, state, user), fields(user_id = %user.user_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user: User) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();

    // Internal command channel between listen and write halves.
    let (int_tx, int_rx) = unbounded_channel::<SocketCommand>();

    tokio::spawn(listen_ws(user.clone(), ws_rx, int_tx, state.clone()));
    tokio::spawn(write_ws(user, ws_tx, int_rx, state));
}

#[instrument(skip(user, websocket_tx, internal_rx, state), fields(user_id = %user.user_id))]
pub async fn write_ws(
    user: User,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<SocketCommand>,
    state: Arc<AppState>,
) {
    info!("Write task started");

    let mut stream_map: StreamMap<String, BroadcastStream<Arc<ChannelEvent>>> = StreamMap::new();

    // Every client implicitly listens on its personal channel and, when it
    // has a tenant, the tenant channel. Attaching here keeps the map
    // non-empty so the select loop never spins on an exhausted stream.
    let personal = user_channel(&user.user_id);
    stream_map.insert(personal.clone(), BroadcastStream::new(state.broker.subscribe(&personal)));
    if let Some(company_id) = &user.company_id {
        let tenant = company_channel(company_id);
        stream_map.insert(tenant.clone(), BroadcastStream::new(state.broker.subscribe(&tenant)));
    }

    'external: loop {
        tokio::select! {
            Some((channel, result)) = tokio_stream::StreamExt::next(&mut stream_map) => {
                match result {
                    Ok(event) => {
                        if forward_event(&mut websocket_tx, &event).await.is_err() {
                            warn!("Failed to forward event, closing connection");
                            break 'external;
                        }
                    }
                    Err(_lagged) => {
                        // The broadcast buffer overflowed for this receiver;
                        // the client resyncs on its next full refresh.
                        warn!(channel = %channel, "Subscriber lagged, events dropped");
                    }
                }
            }

            command = internal_rx.recv() => {
                match command {
                    Some(SocketCommand::Attach(channel)) => {
                        info!(channel = %channel, "Attaching channel subscription");
                        let rx = state.broker.subscribe(&channel);
                        stream_map.insert(channel, BroadcastStream::new(rx));
                    }
                    Some(SocketCommand::Detach(channel)) => {
                        info!(channel = %channel, "Detaching channel subscription");
                        stream_map.remove(&channel);
                    }
                    Some(SocketCommand::Reject(channel)) => {
                        let frame = SubscriptionError {
                            channel: &channel,
                            event: "subscription-denied",
                        };
                        if let Ok(json) = serde_json::to_string(&frame) {
                            if let Err(e) = websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await {
                                error!("Failed to send denial frame: {:?}", e);
                                break 'external;
                            }
                        }
                    }
                    Some(SocketCommand::Shutdown) | None => {
                        info!("Shutdown, write task terminating");
                        break 'external;
                    }
                }
            }
        }
    }

    info!("Write task terminated");
}

async fn forward_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &ChannelEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await
}

#[instrument(skip(user, websocket_rx, internal_tx, state), fields(user_id = %user.user_id))]
pub async fn listen_ws(
    user: User,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<SocketCommand>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    while let Some(msg_result) = websocket_rx.next().await {
        let msg = match msg_result {
            Ok(m) => m,
            Err(e) => {
                warn!("WebSocket error: {:?}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                // Malformed frames are ignored without dropping the socket.
                let Ok(frame) = serde_json::from_str::<ClientFrame>(&text) else {
                    warn!("Failed to deserialize client frame");
                    continue;
                };

                let command = match frame {
                    ClientFrame::Subscribe { channel } => {
                        match authorize_subscription(&state, &user, &channel).await {
                            Ok(()) => SocketCommand::Attach(channel),
                            Err(_) => SocketCommand::Reject(channel),
                        }
                    }
                    ClientFrame::Unsubscribe { channel } => SocketCommand::Detach(channel),
                };

                if internal_tx.send(command).is_err() {
                    debug!("Write task gone, listen task terminating");
                    break;
                }
            }
            Message::Close(_) => {
                info!("Close frame received");
                break;
            }
            _ => {}
        }
    }

    // Stops the write task as well; unsubscription is implicit in dropping
    // the broadcast receivers.
    let _ = internal_tx.send(SocketCommand::Shutdown);
    info!("Listen task terminated");
}
