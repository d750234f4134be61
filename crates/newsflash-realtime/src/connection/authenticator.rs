//! WebSocket authentication — validates the access token presented at
//! connection open.

use std::sync::Arc;

use newsflash_auth::jwt::decoder::JwtDecoder;
use newsflash_core::error::AppError;
use newsflash_core::types::id::UserId;

/// Authenticated connection info extracted from the access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedConnection {
    /// Account ID.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
}

/// Authenticates WebSocket connections using JWT access tokens.
///
/// Authentication happens exactly once, before the upgrade completes; a
/// failure closes the connection attempt with no presence entry created.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a connection using a JWT token from the query string.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedConnection, AppError> {
        let claims = self.decoder.decode_access_token(token)?;

        Ok(AuthenticatedConnection {
            user_id: claims.user_id(),
            display_name: claims.name,
        })
    }
}
