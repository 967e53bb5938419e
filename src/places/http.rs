//! Place gateway backed by an HTTP search API

use super::{PlaceDetails, PlaceGateway, PlaceSummary};
use crate::gateway::GatewayError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for a places search/details REST endpoint
///
/// Expects `GET {endpoint}/search?query=..` and `GET {endpoint}/details/{id}`,
/// both authenticated with a bearer key.
pub struct HttpPlaceGateway {
    endpoint: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl HttpPlaceGateway {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn map_error(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                seconds: DEFAULT_TIMEOUT_SECS,
            }
        } else if err.is_connect() {
            GatewayError::Network {
                message: format!("connection failed: {}", err),
            }
        } else {
            GatewayError::Network {
                message: err.to_string(),
            }
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(GatewayError::Authentication {
                message: format!("place API rejected credentials: {}", body),
            }),
            429 => Err(GatewayError::RateLimit { retry_after: None }),
            code => Err(GatewayError::Api {
                message: body,
                status_code: Some(code),
            }),
        }
    }
}

impl std::fmt::Debug for HttpPlaceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlaceGateway")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlaceGateway for HttpPlaceGateway {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSummary>, GatewayError> {
        debug!(query, "searching places");
        let url = format!("{}/search", self.endpoint);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(Self::map_error)?;
        let response = Self::check_status(response).await?;

        let body: SearchResponse = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse {
                message: format!("malformed search response: {}", e),
                raw_response: None,
            }
        })?;
        Ok(body.results)
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, GatewayError> {
        debug!(place_id, "fetching place details");
        let url = format!("{}/details/{}", self.endpoint, place_id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::map_error)?;
        let response = Self::check_status(response).await?;

        response
            .json::<PlaceDetails>()
            .await
            .map_err(|e| GatewayError::InvalidResponse {
                message: format!("malformed details response: {}", e),
                raw_response: None,
            })
    }

    fn name(&self) -> &str {
        "http-places"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PlaceSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_stripped() {
        let gateway = HttpPlaceGateway::new("https://places.example/", "key");
        assert_eq!(gateway.endpoint, "https://places.example");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let gateway = HttpPlaceGateway::new("https://places.example", "secret-key");
        let dump = format!("{:?}", gateway);
        assert!(!dump.contains("secret-key"));
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{"results":[{"place_id":"a","name":"Cafe","address":"1 St","category":"Cafe","rating":4.2}]}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].rating, Some(4.2));
    }

    #[test]
    fn test_search_response_empty_body() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
