//! Redis cache client implementation
//!
//! This module provides a Redis client with a shared multiplexed connection,
//! per-command timeouts and retry logic for transient transport failures.
//! It backs the credential store through the [`KeyValueCache`] trait:
//! string values with millisecond expiry plus the set commands used by the
//! per-user token index.

use async_trait::async_trait;
use redis::{
    aio::MultiplexedConnection,
    AsyncCommands, Client, IntoConnectionInfo, RedisError, RedisResult,
};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use hc_core::errors::CacheError;
use hc_core::repositories::KeyValueCache;
use hc_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the retry backoff
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with connection sharing and retry logic
///
/// Cloning is cheap; clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// Connection attempts are retried with exponential backoff up to
    /// `config.max_retries` times.
    ///
    /// # Example
    /// ```no_run
    /// use hc_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_prefix("huecontrol");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            database = config.database,
            "Creating Redis client"
        );

        let mut info = config.url.as_str().into_connection_info().map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;
        if config.database != 0 {
            info.redis.db = i64::from(config.database);
        }

        let client = Client::open(info).map_err(|e| {
            error!("Failed to open Redis client: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, &config).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        let connect_timeout = Duration::from_millis(config.response_timeout_ms);
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::Timeout {
                    millis: config.response_timeout_ms,
                }),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Set a value that expires after `ttl` (millisecond resolution)
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), InfrastructureError> {
        let millis = ttl_millis(ttl);
        debug!(ttl_ms = millis, "Setting key with expiry");

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();

            Box::pin(async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("PX")
                    .arg(millis)
                    .query_async::<_, ()>(&mut conn)
                    .await
            })
        })
        .await
    }

    /// Get a value; `None` if absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
    }

    /// Delete a key; returns whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let deleted = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();

                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await?;

        Ok(deleted > 0)
    }

    /// Delete several keys with a single DEL; returns how many existed
    pub async fn delete_many(&self, keys: &[String]) -> Result<usize, InfrastructureError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .execute_with_retry(|mut conn| {
                let keys = keys.to_vec();

                Box::pin(async move { conn.del::<_, u64>(keys).await })
            })
            .await?;

        debug!(requested = keys.len(), deleted, "Deleted keys");
        Ok(deleted as usize)
    }

    /// SADD one member; returns whether it was new
    pub async fn set_add(&self, key: &str, member: &str) -> Result<bool, InfrastructureError> {
        let added = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let member = member.to_string();

                Box::pin(async move { conn.sadd::<_, _, u32>(key, member).await })
            })
            .await?;

        Ok(added > 0)
    }

    /// SREM several members; returns how many were present
    pub async fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, InfrastructureError> {
        if members.is_empty() {
            return Ok(0);
        }

        let removed = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let members = members.to_vec();

                Box::pin(async move { conn.srem::<_, _, u64>(key, members).await })
            })
            .await?;

        Ok(removed as usize)
    }

    /// SMEMBERS; empty when the set does not exist
    pub async fn set_members(&self, key: &str) -> Result<Vec<String>, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.smembers::<_, Vec<String>>(key).await })
        })
        .await
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Execute a Redis operation with a response timeout and retry logic
    ///
    /// Only transient transport errors are retried. A timeout is returned
    /// immediately, since the command may already have been applied.
    async fn execute_with_retry<F, T>(&self, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.max_retries.max(1);
        let response_timeout = Duration::from_millis(self.config.response_timeout_ms);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match timeout(response_timeout, operation(conn)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Ok(Err(e)) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
                Err(_) => {
                    error!(
                        "Redis operation timed out after {}ms",
                        self.config.response_timeout_ms
                    );
                    return Err(InfrastructureError::Timeout {
                        millis: self.config.response_timeout_ms,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl KeyValueCache for RedisClient {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        Ok(RedisClient::set_with_expiry(self, key, value, ttl).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(RedisClient::get(self, key).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(RedisClient::delete(self, key).await?)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, CacheError> {
        Ok(RedisClient::delete_many(self, keys).await?)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, CacheError> {
        Ok(RedisClient::set_add(self, key, member).await?)
    }

    async fn set_remove(&self, key: &str, members: &[String]) -> Result<usize, CacheError> {
        Ok(RedisClient::set_remove(self, key, members).await?)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        Ok(RedisClient::set_members(self, key).await?)
    }
}

/// TTL in whole milliseconds, saturating at `u64::MAX`
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

/// Check if a Redis error is retriable
///
/// Determines if an error is transient and the operation should be retried.
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            if proto_end < at_pos {
                let proto = &url[..proto_end + 3];
                let host_part = &url[at_pos..];
                return format!("{}****{}", proto, host_part);
            }
        }
    }
    url.to_string()
}
