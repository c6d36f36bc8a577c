//! Credential repository trait defining the persistence contract for bearer tokens.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::{Token, User, UserId};
use crate::errors::TokenResult;

/// Persistence operations behind the token service
///
/// The primary token entry is authoritative for validity. The per-owner
/// index only serves bulk revocation and counting, and may hold stale
/// members that implementations must treat as already gone.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Store the credential record for `token` with lifetime `ttl` and index it under its owner
    ///
    /// # Returns
    /// * `Ok(())` - Record and index entry written
    /// * `Err(TokenError::Infrastructure)` - Cache failure; the index entry may be missing
    async fn put(&self, token: &Token, user: &User, ttl: Duration) -> TokenResult<()>;

    /// Resolve a token to the user it was issued to
    ///
    /// # Returns
    /// * `Ok(User)` - A live record exists
    /// * `Err(TokenError::NotFound)` - Absent, expired, or revoked
    /// * `Err(TokenError::Infrastructure)` - Cache failure or undecodable record
    async fn get(&self, token: &str) -> TokenResult<User>;

    /// Remove one token; succeeds when it is already gone
    async fn delete_one(&self, owner: &UserId, token: &str) -> TokenResult<()>;

    /// Remove every token indexed under `owner`
    ///
    /// Returns the number of index members processed, stale ones included.
    async fn delete_all(&self, owner: &UserId) -> TokenResult<usize>;

    /// Number of live tokens for `owner`; stale index members are pruned
    async fn live_count(&self, owner: &UserId) -> TokenResult<usize>;
}
