//! Cache module for the credential store
//!
//! Provides the Redis client and the backend selection used to build the
//! credential store from configuration.

pub mod backend;
pub mod redis_client;


pub use backend::CacheHandle;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use hc_shared::config::{CacheBackend, CacheConfig};
