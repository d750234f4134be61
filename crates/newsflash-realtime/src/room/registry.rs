//! Room registry — ephemeral per-post subscriptions for live comment and
//! typing fan-out. Connection-scoped, no durability.

use std::collections::HashSet;

use dashmap::DashMap;

use newsflash_core::types::id::PostId;

use crate::connection::handle::ConnectionId;

/// Tracks which connections are viewing which posts.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Post ID → member connection IDs.
    rooms: DashMap<PostId, HashSet<ConnectionId>>,
    /// Connection ID → joined post IDs (reverse index).
    by_connection: DashMap<ConnectionId, HashSet<PostId>>,
}

impl RoomRegistry {
    /// Creates a new empty room registry.
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            by_connection: DashMap::new(),
        }
    }

    /// Adds a connection to a post room.
    pub fn join(&self, post_id: PostId, conn_id: ConnectionId) {
        self.rooms.entry(post_id).or_default().insert(conn_id);
        self.by_connection.entry(conn_id).or_default().insert(post_id);
    }

    /// Removes a connection from a post room.
    pub fn leave(&self, post_id: PostId, conn_id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(&post_id) {
            members.remove(&conn_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove(&post_id);
            }
        }
        if let Some(mut joined) = self.by_connection.get_mut(&conn_id) {
            joined.remove(&post_id);
        }
    }

    /// Removes a connection from all rooms. Returns the rooms it was in.
    pub fn leave_all(&self, conn_id: ConnectionId) -> HashSet<PostId> {
        let joined = self
            .by_connection
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default();

        for post_id in &joined {
            if let Some(mut members) = self.rooms.get_mut(post_id) {
                members.remove(&conn_id);
                if members.is_empty() {
                    drop(members);
                    self.rooms.remove(post_id);
                }
            }
        }

        joined
    }

    /// Returns the member connection IDs of a post room.
    pub fn members(&self, post_id: PostId) -> Vec<ConnectionId> {
        self.rooms
            .get(&post_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the number of rooms a connection has joined.
    pub fn joined_count(&self, conn_id: ConnectionId) -> usize {
        self.by_connection
            .get(&conn_id)
            .map(|joined| joined.len())
            .unwrap_or(0)
    }

    /// Returns the total number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_join_and_members() {
        let registry = RoomRegistry::new();
        let post = PostId::new();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        registry.join(post, c1);
        registry.join(post, c2);

        let members = registry.members(post);
        assert_eq!(members.len(), 2);
        assert!(members.contains(&c1));
        assert!(members.contains(&c2));
    }

    #[test]
    fn test_leave_drops_empty_room() {
        let registry = RoomRegistry::new();
        let post = PostId::new();
        let conn = Uuid::new_v4();

        registry.join(post, conn);
        assert_eq!(registry.room_count(), 1);

        registry.leave(post, conn);
        assert_eq!(registry.room_count(), 0);
        assert!(registry.members(post).is_empty());
    }

    #[test]
    fn test_leave_all_cleans_reverse_index() {
        let registry = RoomRegistry::new();
        let p1 = PostId::new();
        let p2 = PostId::new();
        let conn = Uuid::new_v4();
        let other = Uuid::new_v4();

        registry.join(p1, conn);
        registry.join(p2, conn);
        registry.join(p2, other);

        let left = registry.leave_all(conn);
        assert_eq!(left.len(), 2);
        assert_eq!(registry.joined_count(conn), 0);
        // p1 is now empty and dropped; p2 still holds the other connection.
        assert_eq!(registry.room_count(), 1);
        assert_eq!(registry.members(p2), vec![other]);
    }
}
