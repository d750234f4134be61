//! Request handlers.

pub mod health;
pub mod push_token;
pub mod ws;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use newsflash_core::error::AppError;
use newsflash_core::types::id::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the bearer token in the Authorization header to an account id.
pub(crate) fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserId, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Expected bearer token"))?;

    let claims = state.jwt_decoder.decode_access_token(token)?;
    Ok(claims.user_id())
}
