//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the HueControl
//! credential subsystem. It provides the concrete cache behind the
//! credential store and the process-level wiring around it.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client implementing `KeyValueCache`, plus backend selection
//! - **Telemetry**: `tracing` subscriber initialisation
//! - **Wiring**: building a ready `TokenService` from `AppConfig`

use hc_core::errors::CacheError;
use hc_core::repositories::CredentialStore;
use hc_core::services::{TokenService, TokenServiceConfig};
use hc_shared::config::AppConfig;
use hc_shared::errors::ConfigError;

/// Cache module - Redis client and backend selection
pub mod cache;

/// Tracing subscriber setup
pub mod telemetry;

pub use cache::{CacheHandle, RedisClient};

/// Token service over the configured cache backend
pub type AppTokenService = TokenService<CredentialStore<CacheHandle>>;

/// Load application configuration from `.env` and the process environment
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    Ok(AppConfig::from_env()?)
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The cache backend selected by `config.cache`
/// - The credential store keyed with the configured prefix
/// - The token service with the configured lifetime and entropy
pub async fn initialize(config: &AppConfig) -> Result<AppTokenService, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        backend = ?config.cache.backend,
        "Initializing infrastructure services..."
    );

    let service_config = TokenServiceConfig::try_from(&config.token)?;
    let cache = CacheHandle::connect(&config.cache).await?;
    let store = CredentialStore::with_config(cache, &config.cache);

    tracing::info!("Infrastructure services initialized successfully");

    Ok(TokenService::new(store, service_config))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A cache command exceeded the response timeout
    #[error("Cache operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for InfrastructureError {
    fn from(err: ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}

impl From<InfrastructureError> for CacheError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) if e.is_io_error() || e.is_connection_dropped() => {
                CacheError::Connection(e.to_string())
            }
            InfrastructureError::Cache(e) => CacheError::Command(e.to_string()),
            InfrastructureError::Timeout { millis } => CacheError::Timeout { millis },
            InfrastructureError::Config(message) => CacheError::Connection(message),
        }
    }
}
