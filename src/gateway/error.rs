//! Completion gateway error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to a completion gateway
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GatewayError {
    /// API request failed with the given message
    #[error("API error{}: {message}", status_code.map(|c| format!(" ({})", c)).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Rate limit exceeded, retry after the specified duration (in seconds)
    #[error("Rate limit exceeded{}", retry_after.map(|s| format!(", retry after {} seconds", s)).unwrap_or_default())]
    RateLimit { retry_after: Option<u64> },

    /// Invalid or malformed response from the gateway
    #[error("Invalid response from gateway: {message}")]
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing API keys, invalid settings, etc.)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network-related error
    #[error("Network error: {message}")]
    Network { message: String },

    /// Generic error for other cases
    #[error("Error: {message}")]
    Other { message: String },
}
