//! Friend request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use newsflash_core::types::id::{FriendRequestId, UserId};

/// A pending friend request, as seen by the fan-out engine.
///
/// Acceptance is handled by the friend-request service, which writes the
/// two symmetric friendship rows in one transaction before fan-out runs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendRequest {
    /// Unique request identifier.
    pub id: FriendRequestId,
    /// The account that sent the request.
    pub sender_id: UserId,
    /// The account being asked.
    pub recipient_id: UserId,
    /// When the request was sent.
    pub created_at: DateTime<Utc>,
}
