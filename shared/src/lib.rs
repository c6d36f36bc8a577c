//! Shared utilities and common types for the HueControl server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (cache, token issuance, logging, environment)
//! - Error types and response structures

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, Environment, LogFormat, LoggingConfig, TokenConfig,
};
pub use errors::{error_codes, ConfigError, ErrorResponse, IntoErrorResponse};
