//! Domain entities representing core business objects.

pub mod token;
pub mod user;


// Re-export commonly used types
pub use token::{CredentialRecord, Token, TokenOptions};
pub use user::{User, UserId, OWNER_ID_LEN};
