//! Read access to the externally-owned social graph.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::{GroupId, UserId};

/// Read access to the friendship graph.
///
/// Friendship rows are stored as two directed edges per accepted request;
/// the owning store maintains the symmetry invariant, so a single directed
/// query is sufficient here.
#[async_trait]
pub trait FriendGraph: Send + Sync + 'static {
    /// Returns all accounts the given user is friends with.
    async fn friend_ids(&self, user_id: UserId) -> AppResult<HashSet<UserId>>;
}

/// Read access to group membership.
#[async_trait]
pub trait GroupDirectory: Send + Sync + 'static {
    /// Returns the current member set of a group.
    ///
    /// An unknown group id yields an empty set, not an error.
    async fn member_ids(&self, group_id: GroupId) -> AppResult<HashSet<UserId>>;
}

/// Display-name lookup for notification text.
#[async_trait]
pub trait DisplayNames: Send + Sync + 'static {
    /// Returns the display name for an account, if the account exists.
    async fn display_name(&self, user_id: UserId) -> AppResult<Option<String>>;
}
