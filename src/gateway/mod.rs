//! Completion gateway abstraction layer
//!
//! Trait-based abstraction over LLM completion endpoints, allowing the
//! production OpenAI-compatible client and the scripted mock to be used
//! interchangeably by the pipeline.

mod client;
mod error;
mod mock;
mod openai;
mod types;

pub use client::CompletionGateway;
pub use error::GatewayError;
pub use mock::{MockCompletion, MockGateway};
pub use openai::OpenAiGateway;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, MessageRole};
