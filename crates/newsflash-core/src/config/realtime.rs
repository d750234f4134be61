//! Real-time delivery channel configuration.

use serde::{Deserialize, Serialize};

/// Live delivery (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound buffer size per connection. When a client falls this far
    /// behind, further events are dropped for that connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum post rooms a single connection may join.
    #[serde(default = "default_max_rooms")]
    pub max_rooms_per_connection: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            max_rooms_per_connection: default_max_rooms(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_rooms() -> usize {
    50
}
