//! Cache configuration module

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Which key-value cache backs the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis server (multi-instance safe)
    Redis,
    /// In-process map (single instance, development and tests)
    Memory,
}

impl std::str::FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" | "mem" => Ok(CacheBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "CACHE_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Backend selection
    #[serde(default = "default_backend")]
    pub backend: CacheBackend,

    /// Redis connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Prefix prepended to every cache key
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,

    /// Per-command response timeout in milliseconds
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Attempts for transient transport failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries (doubled per attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_url(),
            key_prefix: None,
            database: 0,
            response_timeout_ms: default_response_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (environment, test fixtures)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(backend) = lookup("CACHE_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(url) = lookup("REDIS_URL") {
            config.url = url;
        }
        config.key_prefix = lookup("REDIS_KEY_PREFIX").filter(|p| !p.is_empty());
        if let Some(db) = lookup("REDIS_DATABASE") {
            let db: u8 = parse_value("REDIS_DATABASE", &db)?;
            config = config.with_database(db);
        }
        if let Some(timeout) = lookup("REDIS_RESPONSE_TIMEOUT_MS") {
            config.response_timeout_ms = parse_value("REDIS_RESPONSE_TIMEOUT_MS", &timeout)?;
        }
        if let Some(retries) = lookup("REDIS_MAX_RETRIES") {
            config.max_retries = parse_value("REDIS_MAX_RETRIES", &retries)?;
        }
        if let Some(delay) = lookup("REDIS_RETRY_DELAY_MS") {
            config.retry_delay_ms = parse_value("REDIS_RETRY_DELAY_MS", &delay)?;
        }

        Ok(config)
    }

    /// Create a new Redis cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Configuration for the in-process backend
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the database number
    pub fn with_database(mut self, db: u8) -> Self {
        self.database = db.min(15);
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        prefixed_key(self.key_prefix.as_deref(), key)
    }
}

/// `prefix:key`, or `key` alone without a prefix
pub fn prefixed_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, key),
        None => key.to_string(),
    }
}

pub(crate) fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn default_backend() -> CacheBackend {
    CacheBackend::Redis
}

fn default_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_response_timeout_ms() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
