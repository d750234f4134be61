//! Presence registry — the only authority on live reachability.

use std::sync::Arc;

use dashmap::DashMap;

use newsflash_core::types::id::UserId;

use crate::connection::handle::ConnectionHandle;

/// Maps each account to its single addressable live connection.
///
/// One entry per account, last connection wins: a second connection from
/// the same account replaces the registry pointer, and fan-out never needs
/// to know about the superseded one. Entries are transient and process
/// local; nothing here is persisted.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    /// Account ID → active connection handle.
    entries: DashMap<UserId, Arc<ConnectionHandle>>,
}

impl PresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registers a connection, unconditionally replacing any prior entry
    /// for the same account. Returns the superseded handle, if any, so the
    /// caller can close it.
    pub fn on_connect(&self, handle: Arc<ConnectionHandle>) -> Option<Arc<ConnectionHandle>> {
        self.entries.insert(handle.user_id, handle)
    }

    /// Removes the entry for the disconnecting handle.
    ///
    /// The entry is removed only if it still points at this exact
    /// connection; a stale disconnect racing a newer connect for the same
    /// account leaves the newer entry untouched. Returns whether an entry
    /// was removed.
    pub fn on_disconnect(&self, handle: &ConnectionHandle) -> bool {
        self.entries
            .remove_if(&handle.user_id, |_, stored| stored.id == handle.id)
            .is_some()
    }

    /// Looks up the live connection for an account. Never blocks.
    pub fn lookup(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.entries.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Checks whether an account has a live connection.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.entries.contains_key(&user_id)
    }

    /// Number of accounts currently online.
    pub fn online_count(&self) -> usize {
        self.entries.len()
    }

    /// All currently connected account IDs.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }
}
