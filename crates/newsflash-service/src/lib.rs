//! # newsflash-service
//!
//! The fan-out layer: resolves the audience of each audience-changing
//! event and drives both delivery channels — live WebSocket emission for
//! connected accounts and push dispatch for everyone else. Fan-out always
//! runs after the triggering write is durably committed and never errors
//! back into the request path.

pub mod audience;
pub mod fanout;
pub mod tokens;

pub use audience::resolver::AudienceResolver;
pub use fanout::orchestrator::FanoutOrchestrator;
pub use tokens::PushTokenService;
