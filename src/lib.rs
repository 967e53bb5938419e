//! pageforge - AI-powered landing page generation for local businesses
//!
//! This library turns structured business data into a complete landing page
//! (HTML document, theme, layout and marketing copy) through a staged LLM
//! pipeline: market analysis, content strategy, then page synthesis.
//!
//! # Core Concepts
//!
//! - **Completion Gateway**: Pluggable LLM access behind the
//!   [`CompletionGateway`] trait, with an OpenAI-compatible HTTP client and an
//!   in-memory mock for tests
//! - **Pipeline**: The staged generation flow sequenced by
//!   [`PipelineOrchestrator`], with per-stage fallbacks so unparsable model
//!   output degrades instead of failing
//! - **Strategies**: `Thorough` runs stages sequentially with critique
//!   passes; `Fast` overlaps work and accepts template fallbacks
//!
//! # Example Usage
//!
//! ```ignore
//! use pageforge::{BusinessData, PipelineOptions, PipelineOrchestrator};
//! use std::sync::Arc;
//!
//! async fn generate(gateway: Arc<dyn pageforge::CompletionGateway>) {
//!     let business = BusinessData::minimal(
//!         "Delicious Pizza Place",
//!         "Restaurant",
//!         "123 Main St",
//!         "+1 (555) 123-4567",
//!     );
//!
//!     let orchestrator = PipelineOrchestrator::new(gateway, PipelineOptions::thorough());
//!     let content = orchestrator.generate(&business).await.unwrap();
//!     println!("{}", content.html_document);
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`gateway`]: LLM gateway trait, OpenAI-compatible client, mock
//! - [`pipeline`]: Stages, orchestrator, data model, theming, rendering
//! - [`places`]: Optional place-search input source
//! - [`store`]: JSON-file persistence for generated pages
//! - [`extract`]: JSON extraction from free-form model responses

// Public modules
pub mod cli;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod pipeline;
pub mod places;
pub mod progress;
pub mod store;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, PageforgeConfig};
pub use extract::{extract_json_str, extract_or_fallback, Extracted};
pub use gateway::{
    CompletionGateway, CompletionRequest, CompletionResponse, GatewayError, MockGateway,
    OpenAiGateway,
};
pub use pipeline::{
    AnalysisResult, BusinessData, FinalContent, GenerationStrategy, PipelineError, PipelineEvent,
    PipelineOptions, PipelineOrchestrator, PipelineStage, ProgressEvent, StrategyResult,
};
pub use places::{MockPlaceGateway, PlaceDetails, PlaceGateway, PlaceSummary};
pub use progress::{LoggingHandler, NoOpHandler, ProgressHandler};
pub use store::{PageStore, StoreError, StoredPage};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
