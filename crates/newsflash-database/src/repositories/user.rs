//! User display-name repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use newsflash_core::error::{AppError, ErrorKind};
use newsflash_core::result::AppResult;
use newsflash_core::traits::DisplayNames;
use newsflash_core::types::id::UserId;

/// Repository over the accounts table.
///
/// The account schema is owned by the user store; this repository reads
/// only what notification text needs.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DisplayNames for UserRepository {
    async fn display_name(&self, user_id: UserId) -> AppResult<Option<String>> {
        sqlx::query_scalar("SELECT display_name FROM accounts WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load display name", e)
            })
    }
}
