//! Push token registration service.

use std::sync::Arc;

use tracing::info;

use newsflash_core::result::AppResult;
use newsflash_core::traits::PushTokenStore;
use newsflash_core::types::id::UserId;

/// Exposes push token lifecycle operations to the API layer.
#[derive(Clone)]
pub struct PushTokenService {
    /// Durable token store.
    store: Arc<dyn PushTokenStore>,
}

impl std::fmt::Debug for PushTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushTokenService").finish()
    }
}

impl PushTokenService {
    /// Creates a new push token service.
    pub fn new(store: Arc<dyn PushTokenStore>) -> Self {
        Self { store }
    }

    /// Registers a device token for an account. Upsert semantics: a
    /// duplicate registration reactivates and refreshes the existing row.
    pub async fn register(
        &self,
        user_id: UserId,
        token: &str,
        device_id: Option<&str>,
        platform: Option<&str>,
    ) -> AppResult<()> {
        self.store
            .register(user_id, token, device_id, platform)
            .await?;

        info!(
            user_id = %user_id,
            device_id = device_id.unwrap_or("-"),
            platform = platform.unwrap_or("-"),
            "Push token registered"
        );
        Ok(())
    }

    /// Unregisters a device token. Idempotent: unregistering an unknown
    /// or already-inactive token succeeds quietly.
    pub async fn unregister(&self, user_id: UserId, token: &str) -> AppResult<()> {
        self.store.deactivate(user_id, token).await?;
        info!(user_id = %user_id, "Push token unregistered");
        Ok(())
    }
}
