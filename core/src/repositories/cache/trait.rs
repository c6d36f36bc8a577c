//! Key-value cache capability used by the credential store.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::CacheError;

/// Minimal key-value cache with native per-key expiry and set values
///
/// Every operation is a single cache command and atomic per key. Nothing
/// is atomic across keys. Implementations must report connectivity and
/// protocol failures as `Err`; a missing key is never an error.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`
    ///
    /// Expiry has millisecond resolution. A zero `ttl` is rejected by Redis,
    /// so callers must pass at least one millisecond.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the value under `key`; `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove several keys in one command; returns how many existed
    async fn delete_many(&self, keys: &[String]) -> Result<usize, CacheError>;

    /// Add `member` to the set under `key`; returns whether it was new
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, CacheError>;

    /// Remove `members` from the set under `key`; returns how many were present
    async fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, CacheError>;

    /// All members of the set under `key`; empty if the set is absent
    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError>;
}
