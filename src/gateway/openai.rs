//! OpenAI-compatible HTTP gateway
//!
//! HTTP client for any endpoint speaking the OpenAI chat-completions protocol
//! (api.openai.com, Ollama, LM Studio, vLLM). This is the production
//! implementation of [`CompletionGateway`]; temperature and token limits come
//! from the per-request settings chosen by each pipeline stage.

use super::client::CompletionGateway;
use super::error::GatewayError;
use super::types::{CompletionRequest, CompletionResponse, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default request timeout for API calls
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI-compatible completion gateway
///
/// # Configuration
///
/// - **endpoint**: API base URL (e.g. "https://api.openai.com" or
///   "http://localhost:11434" for Ollama)
/// - **model**: model name (e.g. "gpt-4o-mini")
/// - **api_key**: bearer token, may be a dummy value for local servers
///
/// # Thread Safety
///
/// Thread-safe; share across tasks with `Arc`.
pub struct OpenAiGateway {
    /// API endpoint URL
    endpoint: String,

    /// Model name to use for inference
    model: String,

    /// Bearer token sent with every request
    api_key: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Request timeout duration
    timeout: Duration,
}

impl OpenAiGateway {
    /// Creates a new gateway with the default timeout
    pub fn new(endpoint: String, model: String, api_key: String) -> Self {
        Self::with_timeout(
            endpoint,
            model,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a new gateway with a custom timeout
    pub fn with_timeout(
        endpoint: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint,
            model,
            api_key,
            http_client,
            timeout,
        }
    }

    /// Checks whether the completion endpoint is reachable
    ///
    /// Makes a lightweight request to `/v1/models`. Returns `Ok(true)` if the
    /// server responds successfully, `Ok(false)` if unreachable or timing out,
    /// or `Err` for other connection errors.
    pub async fn health_check(&self) -> Result<bool, GatewayError> {
        let url = format!("{}/v1/models", self.endpoint);

        debug!("Checking gateway health at {}", url);

        match self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => {
                let is_healthy = response.status().is_success();
                if is_healthy {
                    info!("Gateway health check successful");
                } else {
                    warn!(
                        "Gateway health check failed with status: {}",
                        response.status()
                    );
                }
                Ok(is_healthy)
            }
            Err(e) => {
                if e.is_timeout() {
                    warn!("Gateway health check timed out");
                    Ok(false)
                } else if e.is_connect() {
                    warn!("Cannot connect to gateway at {}", self.endpoint);
                    Ok(false)
                } else {
                    error!("Gateway health check error: {}", e);
                    Err(GatewayError::Network {
                        message: format!("Health check failed: {}", e),
                    })
                }
            }
        }
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let api_request = ApiRequest {
            model: self.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: match m.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    }
                    .to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: Some(false),
        };

        debug!(
            "Sending completion request: messages={}, temperature={:?}",
            api_request.messages.len(),
            api_request.temperature
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Gateway request timed out after {:?}", self.timeout);
                    GatewayError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    error!("Cannot connect to gateway at {}", self.endpoint);
                    GatewayError::Network {
                        message: format!("Connection failed: {}", e),
                    }
                } else {
                    error!("Gateway request error: {}", e);
                    GatewayError::Network {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let elapsed = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gateway returned error status {}: {}", status, body);

            return Err(match status.as_u16() {
                401 | 403 => GatewayError::Authentication {
                    message: format!("HTTP {}: {}", status, body),
                },
                429 => GatewayError::RateLimit { retry_after: None },
                _ => GatewayError::Api {
                    message: format!("HTTP {}: {}", status, body),
                    status_code: Some(status.as_u16()),
                },
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse gateway response: {}", e);
            GatewayError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: None,
            }
        })?;

        debug!(
            "Gateway stats: prompt_tokens={}, completion_tokens={}",
            api_response
                .usage
                .as_ref()
                .map(|u| u.prompt_tokens)
                .unwrap_or(0),
            api_response
                .usage
                .as_ref()
                .map(|u| u.completion_tokens)
                .unwrap_or(0),
        );

        let content = api_response
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .map(|message| message.content.clone())
            .ok_or_else(|| GatewayError::InvalidResponse {
                message: "No content in gateway response".to_string(),
                raw_response: None,
            })?;

        info!(
            "Completion finished in {:.2}s ({} chars)",
            elapsed.as_secs_f64(),
            content.len()
        );

        Ok(CompletionResponse::text(content, elapsed))
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model_info(&self) -> Option<String> {
        Some(format!("{} @ {}", self.model, self.endpoint))
    }
}

impl fmt::Debug for OpenAiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiGateway")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Message structure for the chat completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

/// Request structure for the chat completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Response structure from the chat completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    index: Option<u32>,
    finish_reason: Option<String>,
    message: Option<ApiMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
