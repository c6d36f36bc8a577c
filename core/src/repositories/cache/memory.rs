//! In-process cache with lazy expiry
//!
//! Used by tests and single-process deployments. Expiry is measured with
//! `tokio::time::Instant`, so tests can drive it with a paused clock.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::CacheError;

use super::r#trait::KeyValueCache;

/// Longest expiry tracked; longer TTLs are clamped
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, Entry>,
    sets: HashMap<String, HashSet<String>>,
}

/// Cloneable in-memory cache; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    state: Arc<RwLock<State>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of string keys still live
    pub async fn live_keys(&self) -> usize {
        let now = Instant::now();
        let state = self.state.read().await;
        state.values.values().filter(|e| e.is_live(now)).count()
    }

    /// Drop every key and set
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.values.clear();
        state.sets.clear();
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::Command("invalid expire time in 'set' command".to_string()));
        }

        let expires_at = Instant::now() + ttl.min(MAX_TTL);

        let mut state = self.state.write().await;
        state.values.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        match state.values.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.values.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        let removed_value = state.values.remove(key).map(|e| e.is_live(now)).unwrap_or(false);
        let removed_set = state.sets.remove(key).is_some();
        Ok(removed_value || removed_set)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        let mut removed = 0;
        for key in keys {
            let removed_value = state.values.remove(key).map(|e| e.is_live(now)).unwrap_or(false);
            let removed_set = state.sets.remove(key).is_some();
            if removed_value || removed_set {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, CacheError> {
        let mut state = self.state.write().await;
        Ok(state
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, CacheError> {
        let mut state = self.state.write().await;
        let Some(set) = state.sets.get_mut(key) else {
            return Ok(0);
        };

        let removed = members.iter().filter(|m| set.remove(m.as_str())).count();
        // Redis drops a set once it is empty
        if set.is_empty() {
            state.sets.remove(key);
        }
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let state = self.state.read().await;
        Ok(state
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}
