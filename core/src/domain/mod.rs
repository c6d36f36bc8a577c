//! Domain layer containing business entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{CredentialRecord, Token, TokenOptions, User, UserId, OWNER_ID_LEN};
