//! Group membership repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use newsflash_core::error::{AppError, ErrorKind};
use newsflash_core::result::AppResult;
use newsflash_core::traits::GroupDirectory;
use newsflash_core::types::id::{GroupId, UserId};

/// Repository over the group membership table.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupDirectory for GroupRepository {
    async fn member_ids(&self, group_id: GroupId) -> AppResult<HashSet<UserId>> {
        // An unknown group simply matches no rows; the empty set falls out
        // without a separate existence check.
        let rows: Vec<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM group_members WHERE group_id = $1")
                .bind(group_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load group members", e)
                })?;

        Ok(rows.into_iter().map(UserId::from).collect())
    }
}
