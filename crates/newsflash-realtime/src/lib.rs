//! # newsflash-realtime
//!
//! Live delivery channel for Newsflash. Provides:
//!
//! - WebSocket connection management with JWT authentication
//! - The presence registry (the only authority on "is this account
//!   reachable live")
//! - Per-post rooms for live comment and typing fan-out
//! - Best-effort, at-most-once event delivery to connected clients
//!
//! Live delivery is a UX convenience layered over the authoritative
//! relational store; there is no queue or replay buffer.

pub mod connection;
pub mod message;
pub mod presence;
pub mod room;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use presence::registry::PresenceRegistry;
pub use room::registry::RoomRegistry;
pub use server::RealtimeEngine;
