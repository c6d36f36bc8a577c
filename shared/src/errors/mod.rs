//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Standard error response structure handed to the transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const CACHE_ERROR: &str = "CACHE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Token entropy of {actual} bytes is below the minimum of {min}")]
    InsufficientEntropy { actual: usize, min: usize },

    #[error("Token entropy of {actual} bytes exceeds the maximum of {max}")]
    ExcessiveEntropy { actual: usize, max: usize },

    #[error("Default token TTL must be greater than zero")]
    ZeroTtl,

    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),
}

impl IntoErrorResponse for ConfigError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(error_codes::CONFIG_ERROR, self.to_string())
    }
}
