//! Push token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use newsflash_core::error::{AppError, ErrorKind};
use newsflash_core::result::AppResult;
use newsflash_core::traits::PushTokenStore;
use newsflash_core::types::id::UserId;

use newsflash_entity::push_token::PushToken;

/// Repository over the push token table.
#[derive(Debug, Clone)]
pub struct PushTokenRepository {
    pool: PgPool,
}

impl PushTokenRepository {
    /// Create a new push token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all token rows for an account, active and inactive.
    pub async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<PushToken>> {
        sqlx::query_as::<_, PushToken>(
            "SELECT * FROM push_tokens WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list push tokens", e))
    }
}

#[async_trait]
impl PushTokenStore for PushTokenRepository {
    async fn register(
        &self,
        user_id: UserId,
        token: &str,
        device_id: Option<&str>,
        platform: Option<&str>,
    ) -> AppResult<()> {
        // A device reissuing its token supersedes the old one: deactivate
        // other active rows for the same (account, device) first so the
        // same physical device never holds two live tokens.
        if let Some(device) = device_id {
            let superseded = sqlx::query(
                "UPDATE push_tokens SET active = FALSE, updated_at = NOW() \
                 WHERE user_id = $1 AND device_id = $2 AND token <> $3 AND active = TRUE",
            )
            .bind(user_id)
            .bind(device)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to supersede device tokens", e)
            })?;

            if superseded.rows_affected() > 0 {
                debug!(
                    user_id = %user_id,
                    device_id = %device,
                    count = superseded.rows_affected(),
                    "Superseded stale device tokens"
                );
            }
        }

        sqlx::query(
            "INSERT INTO push_tokens (id, user_id, token, device_id, platform, active, updated_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, NOW()) \
             ON CONFLICT (user_id, token) DO UPDATE \
             SET active = TRUE, device_id = EXCLUDED.device_id, \
                 platform = EXCLUDED.platform, updated_at = NOW()",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token)
        .bind(device_id)
        .bind(platform)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to register token", e))?;

        Ok(())
    }

    async fn deactivate(&self, user_id: UserId, token: &str) -> AppResult<()> {
        // Matching zero rows is fine: unregistering a token that was never
        // registered, or already inactive, is a valid client retry path.
        sqlx::query(
            "UPDATE push_tokens SET active = FALSE, updated_at = NOW() \
             WHERE user_id = $1 AND token = $2",
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate token", e))?;

        Ok(())
    }

    async fn active_tokens_for(&self, user_ids: &[UserId]) -> AppResult<Vec<String>> {
        let ids: Vec<Uuid> = user_ids.iter().map(|id| id.0).collect();

        sqlx::query_scalar(
            "SELECT token FROM push_tokens WHERE active = TRUE AND user_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load active tokens", e))
    }
}
