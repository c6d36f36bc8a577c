//! Error types for credential issuance, lookup and revocation
//!
//! `TokenError` is the taxonomy callers see. `CacheError` is what a
//! [`KeyValueCache`](crate::repositories::KeyValueCache) implementation
//! reports; every cache failure surfaces to callers as
//! `TokenError::Infrastructure`, never as `NotFound`.

use thiserror::Error;

/// Errors returned by the token service and credential store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token absent, expired, or revoked; the three are indistinguishable
    #[error("Token not found")]
    NotFound,

    /// Token string could not be decoded; only non-authorizing helpers return this
    #[error("Malformed token")]
    MalformedToken,

    /// Cache unreachable, serialization failure, or random source failure
    #[error("Infrastructure error: {message}")]
    Infrastructure { message: String },
}

impl TokenError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        TokenError::Infrastructure {
            message: message.into(),
        }
    }

    /// Caller should answer with an unauthorized response
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TokenError::NotFound | TokenError::MalformedToken)
    }

    /// Caller should answer with a server error
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, TokenError::Infrastructure { .. })
    }
}

/// Errors reported by key-value cache implementations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Cache command failed: {0}")]
    Command(String),

    #[error("Cache payload serialization failed: {0}")]
    Serialization(String),
}

impl From<CacheError> for TokenError {
    fn from(err: CacheError) -> Self {
        TokenError::Infrastructure {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
