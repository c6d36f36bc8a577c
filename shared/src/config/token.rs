//! Bearer token issuance configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::cache::parse_value;
use crate::errors::ConfigError;

/// Smallest entropy accepted for a token, in bytes
pub const MIN_ENTROPY_BYTES: usize = 16;

/// Longest encoded token accepted for lookup
pub const MAX_TOKEN_LEN: usize = 256;

/// Largest entropy whose encoded token still fits in `MAX_TOKEN_LEN`
///
/// The decoded token is `32 + 1 + n` bytes; unpadded base64 encodes that
/// in `ceil(4 * (33 + n) / 3)` characters.
pub const MAX_ENTROPY_BYTES: usize = MAX_TOKEN_LEN * 3 / 4 - 33;

/// Bearer token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Lifetime of a token issued without an explicit duration, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Random bytes appended to the owner id in each token
    #[serde(default = "default_entropy_bytes")]
    pub entropy_bytes: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            entropy_bytes: default_entropy_bytes(),
        }
    }
}

impl TokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ttl) = lookup("TOKEN_DEFAULT_TTL_SECS") {
            config.default_ttl_secs = parse_value("TOKEN_DEFAULT_TTL_SECS", &ttl)?;
        }
        if let Some(entropy) = lookup("TOKEN_ENTROPY_BYTES") {
            config.entropy_bytes = parse_value("TOKEN_ENTROPY_BYTES", &entropy)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the default lifetime in hours
    pub fn with_default_ttl_hours(mut self, hours: u64) -> Self {
        self.default_ttl_secs = hours * 3600;
        self
    }

    /// Set the entropy length
    pub fn with_entropy_bytes(mut self, bytes: usize) -> Self {
        self.entropy_bytes = bytes;
        self
    }

    /// Default lifetime as a `Duration`
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Reject settings that would weaken or break issuance
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entropy_bytes < MIN_ENTROPY_BYTES {
            return Err(ConfigError::InsufficientEntropy {
                actual: self.entropy_bytes,
                min: MIN_ENTROPY_BYTES,
            });
        }
        if self.entropy_bytes > MAX_ENTROPY_BYTES {
            return Err(ConfigError::ExcessiveEntropy {
                actual: self.entropy_bytes,
                max: MAX_ENTROPY_BYTES,
            });
        }
        if self.default_ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }
}

fn default_ttl_secs() -> u64 {
    604800 // 7 days
}

fn default_entropy_bytes() -> usize {
    24
}
