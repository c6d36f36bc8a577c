//! Cache double whose every command fails

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::CacheError;

use super::r#trait::KeyValueCache;

/// Simulates an unreachable cache
#[derive(Debug, Clone, Default)]
pub struct FailingCache {
    calls: Arc<AtomicUsize>,
}

impl FailingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Connection("connection refused".to_string()))
    }
}

#[async_trait]
impl KeyValueCache for FailingCache {
    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.fail()
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        self.fail()
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<usize, CacheError> {
        self.fail()
    }

    async fn set_add(&self, _key: &str, _member: &str) -> Result<bool, CacheError> {
        self.fail()
    }

    async fn set_remove(&self, _key: &str, _members: &[String]) -> Result<usize, CacheError> {
        self.fail()
    }

    async fn set_members(&self, _key: &str) -> Result<Vec<String>, CacheError> {
        self.fail()
    }
}
