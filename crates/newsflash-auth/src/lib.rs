//! # newsflash-auth
//!
//! JWT access-token encoding and verification. Token issuance lives in the
//! account service; the fan-out core only verifies tokens at the live
//! channel boundary and resolves them to an account id.

pub mod jwt;

pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::JwtEncoder;
