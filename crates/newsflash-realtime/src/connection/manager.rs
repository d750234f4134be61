//! Connection manager — handles connection lifecycle (register, unregister,
//! inbound message routing) and live delivery to connected accounts.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use newsflash_core::config::RealtimeConfig;
use newsflash_core::types::id::{PostId, UserId};

use crate::message::types::{InboundMessage, OutboundMessage};
use crate::presence::registry::PresenceRegistry;
use crate::room::registry::RoomRegistry;

use super::handle::{ConnectionHandle, ConnectionId};

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection ID → handle, for room-addressed sends.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Presence registry.
    presence: Arc<PresenceRegistry>,
    /// Per-post room registry.
    rooms: Arc<RoomRegistry>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        presence: Arc<PresenceRegistry>,
        rooms: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            connections: DashMap::new(),
            presence,
            rooms,
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and the receiver the socket task
    /// drains for outbound messages. Any prior connection for the same
    /// account is superseded and closed (last connection wins).
    pub fn register(
        &self,
        user_id: UserId,
        display_name: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, display_name, tx));

        self.connections.insert(handle.id, handle.clone());

        if let Some(superseded) = self.presence.on_connect(handle.clone()) {
            superseded.mark_closed();
            self.connections.remove(&superseded.id);
            self.rooms.leave_all(superseded.id);
            info!(
                user_id = %user_id,
                old_conn = %superseded.id,
                new_conn = %handle.id,
                "Connection superseded by newer one for the same account"
            );
        }

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "Live connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and cleans up its rooms and presence entry.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, handle)) = self.connections.remove(conn_id) {
            handle.mark_closed();
            self.rooms.leave_all(*conn_id);

            // Guarded removal: a stale disconnect must not evict a newer
            // connection's presence entry.
            let removed = self.presence.on_disconnect(&handle);

            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                presence_cleared = removed,
                "Live connection unregistered"
            );
        }
    }

    /// Processes an inbound message from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let handle = match self.connections.get(conn_id) {
            Some(entry) => entry.value().clone(),
            None => {
                warn!(conn_id = %conn_id, "Message from unknown connection");
                return;
            }
        };

        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
                return;
            }
        };

        match msg {
            InboundMessage::JoinPost { post_id } => {
                if self.rooms.joined_count(*conn_id) >= self.config.max_rooms_per_connection {
                    handle.send(OutboundMessage::Error {
                        code: "MAX_ROOMS".to_string(),
                        message: format!(
                            "Maximum joined rooms ({}) reached",
                            self.config.max_rooms_per_connection
                        ),
                    });
                    return;
                }
                self.rooms.join(post_id, *conn_id);
                handle.send(OutboundMessage::Joined { post_id });
                debug!(conn_id = %conn_id, post_id = %post_id, "Joined post room");
            }
            InboundMessage::LeavePost { post_id } => {
                self.rooms.leave(post_id, *conn_id);
                debug!(conn_id = %conn_id, post_id = %post_id, "Left post room");
            }
            InboundMessage::Typing { post_id } => {
                self.broadcast_to_room(
                    post_id,
                    OutboundMessage::Typing {
                        post_id,
                        user_id: handle.user_id,
                        display_name: handle.display_name.clone(),
                    },
                    Some(handle.user_id),
                );
            }
            InboundMessage::Pong { .. } => {}
        }
    }

    /// Sends an event to one account's live connection, if it has one.
    ///
    /// Best-effort: returns whether the event was handed to a connection.
    pub fn send_to_user(&self, user_id: UserId, message: OutboundMessage) -> bool {
        match self.presence.lookup(user_id) {
            Some(handle) => handle.send(message),
            None => false,
        }
    }

    /// Sends an event to every recipient that is currently connected.
    ///
    /// Returns the number of connections the event was handed to. Offline
    /// recipients are simply skipped; the push channel covers them.
    pub fn send_to_users(&self, user_ids: &HashSet<UserId>, message: &OutboundMessage) -> usize {
        let mut delivered = 0;
        for user_id in user_ids {
            if self.send_to_user(*user_id, message.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Broadcasts a message to a post room, optionally excluding the
    /// account that originated it.
    pub fn broadcast_to_room(
        &self,
        post_id: PostId,
        message: OutboundMessage,
        exclude_user: Option<UserId>,
    ) {
        for member_id in self.rooms.members(post_id) {
            if let Some(handle) = self.connections.get(&member_id) {
                if Some(handle.user_id) == exclude_user {
                    continue;
                }
                handle.send(message.clone());
            }
        }
    }

    /// Checks if an account is currently reachable live.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.presence.is_online(user_id)
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let ids: Vec<ConnectionId> = self.connections.iter().map(|entry| *entry.key()).collect();
        for conn_id in &ids {
            self.unregister(conn_id);
        }
        info!(count = ids.len(), "All live connections closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsflash_core::types::id::PostId;

    fn manager() -> ConnectionManager {
        ConnectionManager::new(
            RealtimeConfig::default(),
            Arc::new(PresenceRegistry::new()),
            Arc::new(RoomRegistry::new()),
        )
    }

    #[tokio::test]
    async fn test_register_supersedes_previous_connection() {
        let mgr = manager();
        let user = UserId::new();

        let (h1, _rx1) = mgr.register(user, "amy".to_string());
        let (h2, _rx2) = mgr.register(user, "amy".to_string());

        assert!(!h1.is_alive());
        assert!(h2.is_alive());
        assert!(mgr.is_online(user));
        assert_eq!(mgr.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_unregister_keeps_newer_connection_online() {
        let mgr = manager();
        let user = UserId::new();

        let (h1, _rx1) = mgr.register(user, "amy".to_string());
        let (h2, _rx2) = mgr.register(user, "amy".to_string());

        // The socket task for h1 finally notices it was closed and cleans up.
        mgr.unregister(&h1.id);

        assert!(mgr.is_online(user));
        assert!(h2.is_alive());
        assert!(mgr.send_to_user(user, OutboundMessage::Ping { timestamp: 0 }));
    }

    #[tokio::test]
    async fn test_send_to_offline_user_is_noop() {
        let mgr = manager();
        assert!(!mgr.send_to_user(UserId::new(), OutboundMessage::Ping { timestamp: 0 }));
    }

    #[tokio::test]
    async fn test_typing_relays_to_room_except_sender() {
        let mgr = manager();
        let post = PostId::new();

        let (viewer_handle, mut viewer_rx) = mgr.register(UserId::new(), "viewer".to_string());
        let (typist_handle, mut typist_rx) = mgr.register(UserId::new(), "typist".to_string());

        mgr.handle_inbound(
            &viewer_handle.id,
            &serde_json::json!({"type": "join_post", "post_id": post}).to_string(),
        );
        mgr.handle_inbound(
            &typist_handle.id,
            &serde_json::json!({"type": "join_post", "post_id": post}).to_string(),
        );

        // Drain the join acks.
        assert!(matches!(
            viewer_rx.recv().await,
            Some(OutboundMessage::Joined { .. })
        ));
        assert!(matches!(
            typist_rx.recv().await,
            Some(OutboundMessage::Joined { .. })
        ));

        mgr.handle_inbound(
            &typist_handle.id,
            &serde_json::json!({"type": "typing", "post_id": post}).to_string(),
        );

        match viewer_rx.recv().await {
            Some(OutboundMessage::Typing {
                post_id,
                user_id,
                display_name,
            }) => {
                assert_eq!(post_id, post);
                assert_eq!(user_id, typist_handle.user_id);
                assert_eq!(display_name, "typist");
            }
            other => panic!("expected typing relay, got {other:?}"),
        }

        // The typist must not receive their own signal.
        assert!(typist_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_inbound_yields_error_message() {
        let mgr = manager();
        let (handle, mut rx) = mgr.register(UserId::new(), "amy".to_string());

        mgr.handle_inbound(&handle.id, "not json");

        match rx.recv().await {
            Some(OutboundMessage::Error { code, .. }) => assert_eq!(code, "INVALID_MESSAGE"),
            other => panic!("expected error message, got {other:?}"),
        }
    }
}
