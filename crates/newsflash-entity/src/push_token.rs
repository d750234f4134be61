//! Push token record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use newsflash_core::types::id::UserId;

/// A durable outbound push address for one account on one device.
///
/// Rows are unique on (user_id, token). Superseded tokens are deactivated,
/// never deleted, so delivery history stays auditable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PushToken {
    /// Row identifier.
    pub id: Uuid,
    /// The owning account.
    pub user_id: UserId,
    /// Raw gateway token string.
    pub token: String,
    /// Client-reported device identifier.
    pub device_id: Option<String>,
    /// Client platform ("ios", "android", ...).
    pub platform: Option<String>,
    /// Whether this token should receive deliveries.
    pub active: bool,
    /// Last registration or deactivation time.
    pub updated_at: DateTime<Utc>,
}
