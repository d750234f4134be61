//! # newsflash-api
//!
//! HTTP and WebSocket surface for the fan-out engine: the live channel
//! upgrade endpoint, push token lifecycle endpoints, and health checks.
//! Post/comment/friend CRUD is owned by the application layer; it receives
//! the fan-out orchestrator through [`state::AppState`].

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
