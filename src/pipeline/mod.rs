//! Content generation pipeline
//!
//! Three stages chained strictly forward (analysis → strategy → synthesis),
//! sequenced by the [`PipelineOrchestrator`] under one of two strategies:
//! `Thorough` (sequential, critique passes, strict artifacts) or `Fast`
//! (analysis and copy drafted concurrently, local theme, template fallback).

pub mod orchestrator;
pub mod prompts;
pub mod render;
pub mod stages;
pub mod theme;
pub mod types;

pub use orchestrator::{GenerationStrategy, PipelineOptions, PipelineOrchestrator};
pub use stages::ArtifactPolicy;
pub use types::{
    AnalysisResult, BusinessData, CallToAction, ContactInfo, FinalContent, PipelineEvent,
    PipelineStage, ProgressEvent, ServiceOffering, StrategyResult,
};

use crate::gateway::GatewayError;
use thiserror::Error;

/// Terminal errors for one pipeline run
///
/// Locally-recoverable failures never surface here: unparsable JSON in any
/// stage response, and gateway errors during analysis or strategy, degrade
/// to typed fallbacks inside the stage. Only synthesis-time failures are
/// terminal.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The completion gateway failed; not retried by the pipeline
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Generated HTML failed document validation under the strict policy
    #[error("Generated HTML is not a complete document: {reason}")]
    InvalidHtml { reason: String },

    /// Theme/layout negotiation came back without a required object under
    /// the strict policy
    #[error("Synthesis response missing required {missing} object")]
    MissingThemeOrLayout { missing: String },

    /// The assembled result violated the all-or-nothing contract
    #[error("Generated content incomplete: {field} is empty")]
    IncompleteContent { field: &'static str },
}
