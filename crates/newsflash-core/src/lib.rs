//! # newsflash-core
//!
//! Core building blocks shared by every Newsflash crate:
//!
//! - Configuration schemas loaded from TOML + environment
//! - The unified [`error::AppError`] type and [`result::AppResult`] alias
//! - Newtype identifiers for domain entities
//! - Collaborator traits consumed by the fan-out engine

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;
