//! Configuration management for pageforge
//!
//! Settings load from environment variables with sensible defaults. The only
//! required variable is the completion endpoint's API key; everything else
//! falls back.
//!
//! # Environment Variables
//!
//! - `PAGEFORGE_API_KEY`: completion API key - **required** for live runs
//! - `PAGEFORGE_ENDPOINT`: OpenAI-compatible base URL - default: "https://api.openai.com"
//! - `PAGEFORGE_MODEL`: model name - default: "gpt-4o-mini"
//! - `PAGEFORGE_REQUEST_TIMEOUT`: timeout in seconds - default: "60"
//! - `PAGEFORGE_STORE_DIR`: page store directory - default: data dir + "pageforge/pages"
//! - `PAGEFORGE_LOG_LEVEL`: logging level - default: "info"
//! - `PAGEFORGE_PLACES_ENDPOINT`: place search base URL - optional
//! - `PAGEFORGE_PLACES_API_KEY`: place search key - optional, defaults to the main key

use crate::gateway::OpenAiGateway;
use crate::places::HttpPlaceGateway;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not specified. Set the PAGEFORGE_API_KEY environment variable")]
    MissingApiKey,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Runtime configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct PageforgeConfig {
    /// OpenAI-compatible completion endpoint base URL
    pub endpoint: String,

    /// Model name sent with every completion request
    pub model: String,

    /// Completion API key; empty when unset
    pub api_key: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Directory the page store writes to
    pub store_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Place search endpoint, when place lookup is configured
    pub places_endpoint: Option<String>,

    /// Place search key; falls back to the main API key
    pub places_api_key: Option<String>,
}

impl Default for PageforgeConfig {
    /// Loads configuration from PAGEFORGE_* environment variables with defaults
    fn default() -> Self {
        let endpoint = env::var("PAGEFORGE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let model = env::var("PAGEFORGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_key = env::var("PAGEFORGE_API_KEY").unwrap_or_default();

        let request_timeout_secs = env::var("PAGEFORGE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let store_dir = env::var("PAGEFORGE_STORE_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(env::temp_dir)
                    .join("pageforge")
                    .join("pages")
            });

        let log_level = env::var("PAGEFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let places_endpoint = env::var("PAGEFORGE_PLACES_ENDPOINT").ok();
        let places_api_key = env::var("PAGEFORGE_PLACES_API_KEY").ok();

        Self {
            endpoint,
            model,
            api_key,
            request_timeout_secs,
            store_dir,
            log_level,
            places_endpoint,
            places_api_key,
        }
    }
}

impl PageforgeConfig {
    /// Validates the configuration for a live run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Creates the completion gateway from this configuration
    pub fn create_gateway(&self) -> Result<Arc<OpenAiGateway>, ConfigError> {
        self.validate()?;
        Ok(Arc::new(OpenAiGateway::with_timeout(
            self.endpoint.clone(),
            self.model.clone(),
            self.api_key.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )))
    }

    /// Creates the place gateway if one is configured
    pub fn create_place_gateway(&self) -> Option<HttpPlaceGateway> {
        let endpoint = self.places_endpoint.as_deref()?;
        let key = self
            .places_api_key
            .as_deref()
            .unwrap_or(self.api_key.as_str());
        Some(HttpPlaceGateway::new(endpoint, key))
    }
}

impl fmt::Display for PageforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pageforge Configuration:")?;
        writeln!(f, "  Endpoint: {}", self.endpoint)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(
            f,
            "  API Key: {}",
            if self.api_key.is_empty() { "(unset)" } else { "(set)" }
        )?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Store Dir: {}", self.store_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        if let Some(ref endpoint) = self.places_endpoint {
            writeln!(f, "  Places Endpoint: {}", endpoint)?;
        }
        Ok(())
    }
}
