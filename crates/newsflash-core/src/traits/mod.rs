//! Collaborator traits consumed by the fan-out engine.
//!
//! The relational store owns the social graph and the push token table;
//! this core only reads them through these seams. Concrete
//! implementations live in `newsflash-database`; tests substitute
//! in-memory fakes.

pub mod push;
pub mod social;

pub use push::PushTokenStore;
pub use social::{DisplayNames, FriendGraph, GroupDirectory};
