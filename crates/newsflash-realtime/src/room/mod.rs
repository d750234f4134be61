//! Per-post room subscriptions.

pub mod registry;

pub use registry::RoomRegistry;
