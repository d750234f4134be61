//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use newsflash_auth::jwt::decoder::JwtDecoder;
use newsflash_core::config::AppConfig;
use newsflash_realtime::server::RealtimeEngine;
use newsflash_service::fanout::orchestrator::FanoutOrchestrator;
use newsflash_service::tokens::PushTokenService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks. The fan-out orchestrator
/// is carried here so the post/comment/friend handlers of the application
/// layer receive it by injection rather than through a process-wide
/// singleton.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Live delivery engine
    pub realtime: Arc<RealtimeEngine>,
    /// Fan-out orchestrator
    pub orchestrator: Arc<FanoutOrchestrator>,
    /// Push token lifecycle service
    pub push_tokens: Arc<PushTokenService>,
}
