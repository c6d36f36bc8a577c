//! Runtime cache backend selection

use async_trait::async_trait;
use std::time::Duration;

use hc_core::errors::CacheError;
use hc_core::repositories::{KeyValueCache, MemoryCache};
use hc_shared::config::{CacheBackend, CacheConfig};

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Cache chosen from `CacheConfig::backend`
#[derive(Clone)]
pub enum CacheHandle {
    Redis(RedisClient),
    Memory(MemoryCache),
}

impl CacheHandle {
    /// Connect the configured backend
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        match config.backend {
            CacheBackend::Redis => Ok(Self::Redis(RedisClient::new(config.clone()).await?)),
            CacheBackend::Memory => {
                tracing::warn!("Using in-process credential cache; tokens are lost on restart");
                Ok(Self::Memory(MemoryCache::new()))
            }
        }
    }

    pub fn backend(&self) -> CacheBackend {
        match self {
            Self::Redis(_) => CacheBackend::Redis,
            Self::Memory(_) => CacheBackend::Memory,
        }
    }

    fn inner(&self) -> &dyn KeyValueCache {
        match self {
            Self::Redis(client) => client,
            Self::Memory(cache) => cache,
        }
    }
}

#[async_trait]
impl KeyValueCache for CacheHandle {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner().set_with_expiry(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner().get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.inner().delete(key).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, CacheError> {
        self.inner().delete_many(keys).await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, CacheError> {
        self.inner().set_add(key, member).await
    }

    async fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, CacheError> {
        self.inner().set_remove(key, members).await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        self.inner().set_members(key).await
    }
}
