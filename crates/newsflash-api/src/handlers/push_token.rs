//! Push token lifecycle handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use newsflash_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

use super::require_user;

/// Body for POST /api/push-tokens.
#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    /// Raw gateway token.
    pub token: String,
    /// Client device identifier.
    pub device_id: Option<String>,
    /// Client platform.
    pub platform: Option<String>,
}

/// Body for DELETE /api/push-tokens.
#[derive(Debug, Deserialize)]
pub struct UnregisterTokenRequest {
    /// Raw gateway token.
    pub token: String,
}

/// POST /api/push-tokens — register or reactivate a device token.
pub async fn register_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterTokenRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&state, &headers)?;

    if req.token.trim().is_empty() {
        return Err(AppError::validation("Token must not be empty").into());
    }

    state
        .push_tokens
        .register(
            user_id,
            &req.token,
            req.device_id.as_deref(),
            req.platform.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/push-tokens — deactivate a device token. Idempotent: an
/// unknown token still returns 204 so client retries stay cheap.
pub async fn unregister_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UnregisterTokenRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&state, &headers)?;

    state.push_tokens.unregister(user_id, &req.token).await?;

    Ok(StatusCode::NO_CONTENT)
}
