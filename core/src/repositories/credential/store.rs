//! Cache-backed credential store
//!
//! Layout, relative to the configured key prefix:
//! - `token:<token>` holds the JSON credential record with a native TTL
//! - `user-tokens:<owner>` is a set of the owner's token strings

use async_trait::async_trait;
use std::time::Duration;

use hc_shared::config::{prefixed_key, CacheConfig};

use crate::domain::entities::{CredentialRecord, Token, User, UserId};
use crate::errors::{CacheError, TokenError, TokenResult};
use crate::repositories::cache::KeyValueCache;

use super::r#trait::CredentialRepository;

const TOKEN_KEY: &str = "token";
const INDEX_KEY: &str = "user-tokens";

/// Credential repository over any [`KeyValueCache`]
#[derive(Debug, Clone)]
pub struct CredentialStore<C: KeyValueCache> {
    cache: C,
    key_prefix: Option<String>,
}

impl<C: KeyValueCache> CredentialStore<C> {
    /// Create a store with unprefixed keys
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            key_prefix: None,
        }
    }

    /// Create a store using the key prefix from `config`
    pub fn with_config(cache: C, config: &CacheConfig) -> Self {
        Self {
            cache,
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Override the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub(crate) fn token_key(&self, token: &str) -> String {
        prefixed_key(
            self.key_prefix.as_deref(),
            &format!("{}:{}", TOKEN_KEY, token),
        )
    }

    pub(crate) fn index_key(&self, owner: &UserId) -> String {
        prefixed_key(
            self.key_prefix.as_deref(),
            &format!("{}:{}", INDEX_KEY, owner.to_fixed_string()),
        )
    }

    fn decode_record(payload: &str) -> TokenResult<CredentialRecord> {
        serde_json::from_str(payload)
            .map_err(CacheError::from)
            .map_err(TokenError::from)
    }
}

#[async_trait]
impl<C: KeyValueCache> CredentialRepository for CredentialStore<C> {
    async fn put(&self, token: &Token, user: &User, ttl: Duration) -> TokenResult<()> {
        let record = CredentialRecord::new(token.clone(), user, ttl);
        let payload = serde_json::to_string(&record).map_err(CacheError::from)?;

        self.cache
            .set_with_expiry(&self.token_key(token.as_str()), &payload, ttl)
            .await?;
        self.cache
            .set_add(&self.index_key(&user.id), token.as_str())
            .await?;

        tracing::debug!(owner = %user.id, ttl_ms = ttl.as_millis() as u64, "Credential stored");
        Ok(())
    }

    async fn get(&self, token: &str) -> TokenResult<User> {
        match self.cache.get(&self.token_key(token)).await? {
            Some(payload) => Ok(Self::decode_record(&payload)?.user),
            None => Err(TokenError::NotFound),
        }
    }

    async fn delete_one(&self, owner: &UserId, token: &str) -> TokenResult<()> {
        self.cache.delete(&self.token_key(token)).await?;
        self.cache
            .set_remove(&self.index_key(owner), &[token.to_string()])
            .await?;
        Ok(())
    }

    async fn delete_all(&self, owner: &UserId) -> TokenResult<usize> {
        let index_key = self.index_key(owner);
        let members = self.cache.set_members(&index_key).await?;
        if members.is_empty() {
            return Ok(0);
        }

        let keys: Vec<String> = members.iter().map(|t| self.token_key(t)).collect();
        let deleted = self.cache.delete_many(&keys).await?;
        // Only the snapshot; tokens indexed since SMEMBERS stay
        self.cache.set_remove(&index_key, &members).await?;

        tracing::debug!(
            owner = %owner,
            count = members.len(),
            deleted,
            "Credentials deleted"
        );
        Ok(members.len())
    }

    async fn live_count(&self, owner: &UserId) -> TokenResult<usize> {
        let index_key = self.index_key(owner);
        let members = self.cache.set_members(&index_key).await?;

        let mut stale = Vec::new();
        for token in &members {
            if self.cache.get(&self.token_key(token)).await?.is_none() {
                stale.push(token.clone());
            }
        }

        if !stale.is_empty() {
            self.cache.set_remove(&index_key, &stale).await?;
            tracing::debug!(owner = %owner, pruned = stale.len(), "Stale index members pruned");
        }

        Ok(members.len() - stale.len())
    }
}
