//! Token service module for bearer credential management
//!
//! This module handles all token-related operations including:
//! - Opaque token generation and owner decoding
//! - Issuance, verification and refresh
//! - Single and bulk revocation
//! - Bearer header parsing for the HTTP layer

mod bearer;
mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use bearer::extract_bearer;
pub use codec::{TokenCodec, TOKEN_SEPARATOR};
pub use config::TokenServiceConfig;
pub use service::{TokenService, MAX_TOKEN_LEN, MAX_TTL, MIN_TTL};
