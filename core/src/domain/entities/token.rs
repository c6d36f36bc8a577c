//! Bearer token entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::user::{User, UserId};

/// Opaque bearer credential
///
/// Consumers other than the codec must treat the value as opaque. `Debug`
/// output is redacted; use [`Token::as_str`] when the value has to cross
/// the wire.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token")
            .field(&format_args!("<redacted:{} chars>", self.0.len()))
            .finish()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Per-issuance options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenOptions {
    /// Time-to-live; `None` falls back to the configured default
    pub duration: Option<Duration>,
}

impl TokenOptions {
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
        }
    }

    /// Effective lifetime given the service default
    pub fn ttl_or(&self, default: Duration) -> Duration {
        self.duration.unwrap_or(default)
    }
}

/// Primary cache entry stored under each live token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub token: Token,
    pub owner_id: UserId,
    pub user: User,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Builds the record for `token` issued now with lifetime `ttl`
    pub fn new(token: Token, user: &User, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token,
            owner_id: user.id,
            user: user.clone(),
            issued_at,
            expires_at,
        }
    }

    /// Whether the wall clock has passed `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
