//! Domain-specific error types and error handling.

mod types;


pub use types::{CacheError, TokenError};

use hc_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

pub type TokenResult<T> = Result<T, TokenError>;

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            TokenError::NotFound | TokenError::MalformedToken => {
                ErrorResponse::new(error_codes::TOKEN_INVALID, "Invalid credentials")
            }
            // Internal details stay in the logs
            TokenError::Infrastructure { .. } => ErrorResponse::new(
                error_codes::CACHE_ERROR,
                "Credential store temporarily unavailable",
            ),
        }
    }
}
