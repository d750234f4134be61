//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT settings for access-token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
}

fn default_access_ttl() -> u64 {
    60
}
