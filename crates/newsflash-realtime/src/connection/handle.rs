//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use newsflash_core::types::id::UserId;

use crate::message::types::OutboundMessage;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the bounded sender for pushing messages to the client, plus
/// metadata about the connected account. Events sent through the one
/// sender arrive at the client in order; a full buffer drops the message
/// rather than blocking fan-out.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Account that owns this connection
    pub user_id: UserId,
    /// Display name (cached for typing relays)
    pub display_name: String,
    /// Sender for outbound messages
    sender: mpsc::Sender<OutboundMessage>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(
        user_id: UserId,
        display_name: String,
        sender: mpsc::Sender<OutboundMessage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            display_name,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Send an outbound message to this connection.
    ///
    /// Best-effort: returns `false` when the connection is closed or its
    /// buffer is full. Delivery is at-most-once; the client recovers
    /// missed events by polling the store on reconnect.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Connection send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as closed
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
