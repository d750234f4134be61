//! Durable push token storage.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Per-account, per-device store of outbound push addresses.
///
/// Uniqueness is on the (account, raw token) pair. Supersession deactivates
/// old rows instead of deleting them so delivery history stays auditable.
#[async_trait]
pub trait PushTokenStore: Send + Sync + 'static {
    /// Registers (or reactivates) a token for an account.
    ///
    /// When a device id is supplied and other active tokens exist for the
    /// same (account, device) with a different token value, those rows are
    /// deactivated — a device reissuing its token supersedes the old one.
    async fn register(
        &self,
        user_id: UserId,
        token: &str,
        device_id: Option<&str>,
        platform: Option<&str>,
    ) -> AppResult<()>;

    /// Marks a token inactive. Idempotent: an absent or already-inactive
    /// row is a no-op, never an error.
    async fn deactivate(&self, user_id: UserId, token: &str) -> AppResult<()>;

    /// Bulk lookup of all active tokens for a set of accounts.
    async fn active_tokens_for(&self, user_ids: &[UserId]) -> AppResult<Vec<String>>;
}
