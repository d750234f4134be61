//! Friendship repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use newsflash_core::error::{AppError, ErrorKind};
use newsflash_core::result::AppResult;
use newsflash_core::traits::FriendGraph;
use newsflash_core::types::id::UserId;

/// Repository over the friendship edge table.
///
/// Accepted friend requests are stored as two directed rows, one per
/// direction; the write path (owned by the friend-request handler)
/// maintains that symmetry inside a single transaction.
#[derive(Debug, Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendGraph for FriendshipRepository {
    async fn friend_ids(&self, user_id: UserId) -> AppResult<HashSet<UserId>> {
        let rows: Vec<Uuid> =
            sqlx::query_scalar("SELECT friend_id FROM friendships WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load friend ids", e)
                })?;

        Ok(rows.into_iter().map(UserId::from).collect())
    }
}
