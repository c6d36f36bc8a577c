//! # HueControl Core
//!
//! Core domain layer for bearer credentials: issuing opaque tokens,
//! resolving them back to their owner, and revoking them one at a time or
//! all at once. Persistence goes through an injected [`KeyValueCache`]
//! capability; the Redis implementation lives in the infrastructure crate.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
