//! Pipeline stages
//!
//! One pure async function per stage, each taking typed input and returning a
//! typed result-or-fallback. Shared helpers live in [`crate::extract`] and
//! [`crate::pipeline::prompts`].

pub mod analysis;
pub mod strategy;
pub mod synthesis;

pub use analysis::analyze_business;
pub use strategy::build_strategy;
pub use synthesis::{synthesize_fast, synthesize_full, ArtifactPolicy};
