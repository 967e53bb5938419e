//! JSON extraction from free-text model output
//!
//! Model responses are free text that is *expected* to contain a JSON object,
//! wrapped in prose or markdown fences more often than not. This module is the
//! sole error boundary between that text and typed downstream code:
//! [`extract_or_fallback`] never fails, degrading to a caller-supplied typed
//! fallback instead.

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Advisory confidence assigned to fallback values
pub const FALLBACK_CONFIDENCE: u8 = 50;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("No JSON object found in response")]
    NoJsonObject,
}

/// A parsed value plus whether it came from the caller's fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub from_fallback: bool,
}

/// Pulls the JSON object out of a free-text response
///
/// Attempts, in order: a fenced markdown block, the whole trimmed response if
/// it already is an object, then the outermost `{` .. `}` span. The outermost
/// span is deliberately preferred over the first balanced match so prose
/// containing stray braces around the object does not truncate it.
pub fn extract_json_str(response: &str) -> Result<String, ExtractError> {
    let trimmed = response.trim();

    if trimmed.contains("```") {
        if let Ok(json) = extract_from_markdown_block(trimmed) {
            return Ok(json);
        }
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if start < end {
                return Ok(trimmed[start..=end].to_string());
            }
        }
    }

    Err(ExtractError::NoJsonObject)
}

fn extract_from_markdown_block(text: &str) -> Result<String, ExtractError> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap();

    if let Some(captures) = re.captures(text) {
        if let Some(json_match) = captures.get(1) {
            let json = json_match.as_str().trim();
            if json.starts_with('{') && json.ends_with('}') {
                return Ok(json.to_string());
            }
        }
    }

    Err(ExtractError::InvalidJson(
        "Could not extract JSON from markdown block".to_string(),
    ))
}

/// Parses a typed value out of a free-text response, never failing
///
/// On success returns the parsed value. On any extraction or deserialization
/// failure returns the caller's `fallback` tagged `from_fallback: true`.
/// Stateless: the same input always yields the same output.
pub fn extract_or_fallback<T: DeserializeOwned>(response: &str, fallback: T) -> Extracted<T> {
    let json_str = match extract_json_str(response) {
        Ok(json) => json,
        Err(e) => {
            warn!("JSON extraction failed, using fallback: {}", e);
            return Extracted {
                value: fallback,
                from_fallback: true,
            };
        }
    };

    match serde_json::from_str::<T>(&json_str) {
        Ok(value) => {
            debug!("Extracted JSON object ({} chars)", json_str.len());
            Extracted {
                value,
                from_fallback: false,
            }
        }
        Err(e) => {
            warn!(
                "JSON parse failed, using fallback: {}: {}",
                e,
                json_str.chars().take(100).collect::<String>()
            );
            Extracted {
                value: fallback,
                from_fallback: true,
            }
        }
    }
}
