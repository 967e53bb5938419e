//! Progress handler trait and built-in handlers

use crate::pipeline::types::{PipelineStage, ProgressEvent};
use tracing::{error, info};

/// Trait for observing progress events during a pipeline run
///
/// Handlers are invoked synchronously between gateway calls; they should
/// return quickly.
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {
        // Intentionally empty
    }
}

/// Handler that mirrors progress events into the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event.stage {
            PipelineStage::Error => {
                error!(stage = %event.stage, progress = event.progress, "{}", event.message)
            }
            _ => info!(stage = %event.stage, progress = event.progress, "{}", event.message),
        }
    }
}
