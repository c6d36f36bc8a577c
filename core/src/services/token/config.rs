//! Configuration for the token service

use std::time::Duration;

use hc_shared::config::{TokenConfig, MAX_ENTROPY_BYTES, MIN_ENTROPY_BYTES};
use hc_shared::errors::ConfigError;

/// Configuration for the token service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenServiceConfig {
    /// Lifetime used when issuance options carry none
    pub default_ttl: Duration,
    /// Random bytes per token
    pub entropy_bytes: usize,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(7 * 24 * 3600),
            entropy_bytes: 24,
        }
    }
}

impl TokenServiceConfig {
    pub fn new(default_ttl: Duration, entropy_bytes: usize) -> Result<Self, ConfigError> {
        if entropy_bytes < MIN_ENTROPY_BYTES {
            return Err(ConfigError::InsufficientEntropy {
                actual: entropy_bytes,
                min: MIN_ENTROPY_BYTES,
            });
        }
        if entropy_bytes > MAX_ENTROPY_BYTES {
            return Err(ConfigError::ExcessiveEntropy {
                actual: entropy_bytes,
                max: MAX_ENTROPY_BYTES,
            });
        }
        if default_ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }

        Ok(Self {
            default_ttl,
            entropy_bytes,
        })
    }
}

impl TryFrom<&TokenConfig> for TokenServiceConfig {
    type Error = ConfigError;

    fn try_from(config: &TokenConfig) -> Result<Self, Self::Error> {
        Self::new(config.default_ttl(), config.entropy_bytes)
    }
}
