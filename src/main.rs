//! Newsflash Server — social-feed fan-out and delivery engine
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use newsflash_core::config::AppConfig;
use newsflash_core::error::AppError;
use newsflash_core::traits::{DisplayNames, FriendGraph, GroupDirectory, PushTokenStore};

use newsflash_database::repositories::friendship::FriendshipRepository;
use newsflash_database::repositories::group::GroupRepository;
use newsflash_database::repositories::push_token::PushTokenRepository;
use newsflash_database::repositories::user::UserRepository;

use newsflash_push::dispatcher::NotificationDispatcher;
use newsflash_push::gateway::http::HttpPushGateway;
use newsflash_realtime::server::RealtimeEngine;
use newsflash_service::audience::resolver::AudienceResolver;
use newsflash_service::fanout::orchestrator::FanoutOrchestrator;
use newsflash_service::tokens::PushTokenService;

#[tokio::main]
async fn main() {
    let env = std::env::var("NEWSFLASH_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Newsflash v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = newsflash_database::connection::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    newsflash_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Step 2: Repositories ─────────────────────────────────────
    let friendship_repo: Arc<dyn FriendGraph> =
        Arc::new(FriendshipRepository::new(db_pool.clone()));
    let group_repo: Arc<dyn GroupDirectory> = Arc::new(GroupRepository::new(db_pool.clone()));
    let user_repo: Arc<dyn DisplayNames> = Arc::new(UserRepository::new(db_pool.clone()));
    let token_repo: Arc<dyn PushTokenStore> = Arc::new(PushTokenRepository::new(db_pool.clone()));

    // ── Step 3: Auth ─────────────────────────────────────────────
    let jwt_decoder = Arc::new(newsflash_auth::jwt::decoder::JwtDecoder::new(&config.auth));

    // ── Step 4: Real-time engine ─────────────────────────────────
    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));

    // ── Step 5: Push dispatch ────────────────────────────────────
    tracing::info!(endpoint = %config.push.endpoint, "Initializing push gateway...");
    let gateway = Arc::new(HttpPushGateway::new(config.push.clone())?);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        token_repo.clone(),
        gateway,
        config.push.batch_size,
    ));

    // ── Step 6: Fan-out orchestration ────────────────────────────
    let resolver = AudienceResolver::new(friendship_repo, group_repo);
    let orchestrator = Arc::new(FanoutOrchestrator::new(
        resolver,
        realtime.connections.clone(),
        dispatcher,
        user_repo,
    ));
    let push_tokens = Arc::new(PushTokenService::new(token_repo));

    // ── Step 7: HTTP server ──────────────────────────────────────
    let app_state = newsflash_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_decoder,
        realtime: realtime.clone(),
        orchestrator,
        push_tokens,
    };

    let app = newsflash_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Newsflash server listening on {addr}");

    // ── Step 8: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    realtime.shutdown();

    tracing::info!("Newsflash server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
