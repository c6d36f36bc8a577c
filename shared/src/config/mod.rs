//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Cache backend and Redis connection settings
//! - `environment` - Environment detection and logging configuration
//! - `token` - Bearer token lifetime and entropy

pub mod cache;
pub mod environment;
pub mod token;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

// Re-export commonly used types
pub use cache::{prefixed_key, CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use token::{TokenConfig, MAX_ENTROPY_BYTES, MAX_TOKEN_LEN, MIN_ENTROPY_BYTES};

/// Prefix for layered environment overrides (`HC__CACHE__URL=...`)
pub const ENV_PREFIX: &str = "HC";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Token issuance configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            cache: CacheConfig::default(),
            token: TokenConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cache: CacheConfig::default(),
            token: TokenConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            cache: CacheConfig::new("redis://redis:6379").with_prefix("huecontrol"),
            token: TokenConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(Environment::from_env(), |key| std::env::var(key).ok())
    }

    /// Build configuration for `environment` from a variable lookup
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache = CacheConfig::from_lookup(&lookup)?;
        let token = TokenConfig::from_lookup(&lookup)?;
        let logging = LoggingConfig::for_environment(environment).apply_overrides(&lookup)?;

        Ok(Self {
            environment,
            cache,
            token,
            logging,
        })
    }

    /// Load layered configuration: optional file at `path`, then `HC__*` variables
    ///
    /// The environment defaults to `Environment::from_env()` when neither
    /// source sets it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = ::config::Config::builder()
            .set_default("environment", Environment::from_env().to_string())?
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate()
    }
}
