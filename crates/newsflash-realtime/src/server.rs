//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use newsflash_core::config::RealtimeConfig;

use crate::connection::manager::ConnectionManager;
use crate::presence::registry::PresenceRegistry;
use crate::room::registry::RoomRegistry;

/// Central real-time engine that coordinates the live delivery channel.
///
/// The presence registry is owned here and reached only through the
/// connection manager's operations; no other component touches the map
/// directly.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Presence registry.
    pub presence: Arc<PresenceRegistry>,
    /// Per-post room registry.
    pub rooms: Arc<RoomRegistry>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let presence = Arc::new(PresenceRegistry::new());
        let rooms = Arc::new(RoomRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            presence.clone(),
            rooms.clone(),
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            presence,
            rooms,
        }
    }

    /// Shuts down the engine, closing all live connections.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.connections.close_all();
    }
}
