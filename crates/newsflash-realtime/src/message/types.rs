//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use newsflash_core::types::id::{PostId, UserId};
use newsflash_entity::notification::NotificationMetadata;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Join the room of a post being actively viewed.
    JoinPost {
        /// Post whose room to join.
        post_id: PostId,
    },
    /// Leave a post room.
    LeavePost {
        /// Post whose room to leave.
        post_id: PostId,
    },
    /// The user is typing a comment on a post.
    Typing {
        /// Post being commented on.
        post_id: PostId,
    },
    /// Pong response to server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A fan-out event for this account. Carries the same payload shape as
    /// the push channel so deep-linking is identical on both.
    Event {
        /// Notification title.
        title: String,
        /// Notification body.
        body: String,
        /// Deep-link metadata.
        metadata: NotificationMetadata,
        /// Badge count.
        badge: u32,
        /// When the event was emitted.
        timestamp: DateTime<Utc>,
    },
    /// Another user is typing in a room this connection joined.
    Typing {
        /// The post room.
        post_id: PostId,
        /// Who is typing.
        user_id: UserId,
        /// Their display name.
        display_name: String,
    },
    /// Room join confirmed.
    Joined {
        /// The post room.
        post_id: PostId,
    },
    /// Ping (server keepalive).
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}
