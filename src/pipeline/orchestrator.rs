use super::stages::{analyze_business, build_strategy, synthesize_fast, synthesize_full};
use super::stages::analysis::fallback_analysis;
use super::types::{BusinessData, FinalContent, PipelineEvent, PipelineStage, ProgressEvent};
use super::{ArtifactPolicy, PipelineError};
use crate::gateway::CompletionGateway;
use crate::progress::ProgressHandler;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info};

/// Orchestration variant for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Sequential stages with critique passes; invalid artifacts are fatal
    Thorough,
    /// Analysis and copy drafted concurrently, single HTML call, local
    /// category theme; invalid artifacts fall back to the template
    Fast,
}

/// Per-orchestrator settings
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub strategy: GenerationStrategy,
    pub artifact_policy: ArtifactPolicy,
    /// Run critique/refinement passes after analysis and strategy
    pub critique: bool,
    /// Free-text owner requirements folded into the analysis prompt
    pub requirements: Option<String>,
}

impl PipelineOptions {
    pub fn thorough() -> Self {
        Self {
            strategy: GenerationStrategy::Thorough,
            artifact_policy: ArtifactPolicy::Strict,
            critique: true,
            requirements: None,
        }
    }

    pub fn fast() -> Self {
        Self {
            strategy: GenerationStrategy::Fast,
            artifact_policy: ArtifactPolicy::Fallback,
            critique: false,
            requirements: None,
        }
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }

    pub fn with_artifact_policy(mut self, policy: ArtifactPolicy) -> Self {
        self.artifact_policy = policy;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::thorough()
    }
}

/// Sequences the generation stages and reports progress
///
/// The gateway is injected at construction and treated as stateless; the
/// orchestrator itself holds no per-run state, so one instance can serve
/// concurrent runs. Exactly one [`FinalContent`] is produced per invocation,
/// or the first fatal error is returned; there are no partial results and no
/// retries.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    gateway: Arc<dyn CompletionGateway>,
    options: PipelineOptions,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineOrchestrator {
    pub fn new(gateway: Arc<dyn CompletionGateway>, options: PipelineOptions) -> Self {
        Self {
            gateway,
            options,
            progress_handler: None,
        }
    }

    /// Attaches a synchronous observer invoked for every progress event
    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs the pipeline to completion
    pub async fn generate(&self, business: &BusinessData) -> Result<FinalContent, PipelineError> {
        self.run(business, |_| {}).await
    }

    /// Runs the pipeline, streaming progress events
    ///
    /// The stream yields zero or more `Progress` items followed by exactly one
    /// `Completed` or `Failed`, then closes. Sends are fire-and-forget: a
    /// dropped receiver never blocks the run.
    pub fn generate_with_progress(
        &self,
        business: BusinessData,
    ) -> UnboundedReceiverStream<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = self.clone();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = orchestrator
                .run(&business, move |event| {
                    let _ = progress_tx.send(PipelineEvent::Progress(event));
                })
                .await;

            let terminal = match result {
                Ok(content) => PipelineEvent::Completed(Box::new(content)),
                Err(e) => PipelineEvent::Failed(e.to_string()),
            };
            let _ = tx.send(terminal);
        });

        UnboundedReceiverStream::new(rx)
    }

    async fn run(
        &self,
        business: &BusinessData,
        emit: impl Fn(ProgressEvent),
    ) -> Result<FinalContent, PipelineError> {
        let start = Instant::now();
        info!(
            business = %business.name,
            strategy = ?self.options.strategy,
            "Starting generation pipeline"
        );

        let notify = |stage: PipelineStage, progress: u8, message: &str| {
            let event = ProgressEvent {
                stage,
                progress,
                message: message.to_string(),
            };
            if let Some(handler) = &self.progress_handler {
                handler.on_progress(&event);
            }
            emit(event);
        };

        let result = match self.options.strategy {
            GenerationStrategy::Thorough => self.run_thorough(business, &notify).await,
            GenerationStrategy::Fast => self.run_fast(business, &notify).await,
        };

        match &result {
            Ok(content) => {
                notify(PipelineStage::Completed, 100, "Landing page ready");
                info!(
                    business = %business.name,
                    html_bytes = content.html_document.len(),
                    elapsed = ?start.elapsed(),
                    "Pipeline complete"
                );
            }
            Err(e) => {
                notify(PipelineStage::Error, 100, &e.to_string());
                error!(business = %business.name, error = %e, "Pipeline failed");
            }
        }

        result
    }

    async fn run_thorough(
        &self,
        business: &BusinessData,
        notify: &impl Fn(PipelineStage, u8, &str),
    ) -> Result<FinalContent, PipelineError> {
        notify(PipelineStage::Analyzing, 10, "Analyzing business profile");
        let analysis = analyze_business(
            self.gateway.as_ref(),
            business,
            self.options.requirements.as_deref(),
            self.options.critique,
        )
        .await;
        debug!(confidence = analysis.confidence, "Analysis stage done");

        notify(PipelineStage::Strategizing, 40, "Writing page copy");
        let strategy = build_strategy(
            self.gateway.as_ref(),
            business,
            &analysis,
            self.options.critique,
        )
        .await;
        debug!(confidence = strategy.confidence, "Strategy stage done");

        notify(PipelineStage::Synthesizing, 70, "Designing the page");
        synthesize_full(
            self.gateway.as_ref(),
            business,
            &analysis,
            &strategy,
            self.options.artifact_policy,
        )
        .await
    }

    async fn run_fast(
        &self,
        business: &BusinessData,
        notify: &impl Fn(PipelineStage, u8, &str),
    ) -> Result<FinalContent, PipelineError> {
        notify(
            PipelineStage::Analyzing,
            15,
            "Analyzing and drafting copy in parallel",
        );

        // The fast variant deliberately does not feed analysis into the copy
        // prompt; the strategy call seeds from the business-derived analysis
        // so neither call waits on the other.
        let seed = fallback_analysis(business);
        let (analysis, strategy) = tokio::join!(
            analyze_business(
                self.gateway.as_ref(),
                business,
                self.options.requirements.as_deref(),
                false,
            ),
            build_strategy(self.gateway.as_ref(), business, &seed, false),
        );

        notify(PipelineStage::Synthesizing, 60, "Designing the page");
        synthesize_fast(self.gateway.as_ref(), business, &analysis, &strategy).await
    }
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("gateway", &self.gateway.name())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockCompletion, MockGateway};
    use crate::progress::NoOpHandler;

    #[tokio::test]
    async fn test_orchestrator_creation() {
        let orchestrator = PipelineOrchestrator::new(
            Arc::new(MockGateway::new()),
            PipelineOptions::thorough(),
        );
        assert!(orchestrator.progress_handler.is_none());
        assert_eq!(
            orchestrator.options().strategy,
            GenerationStrategy::Thorough
        );
    }

    #[tokio::test]
    async fn test_orchestrator_with_progress_handler() {
        let orchestrator =
            PipelineOrchestrator::new(Arc::new(MockGateway::new()), PipelineOptions::fast())
                .with_progress_handler(Arc::new(NoOpHandler));
        assert!(orchestrator.progress_handler.is_some());
    }

    #[test]
    fn test_default_options_are_thorough_and_strict() {
        let options = PipelineOptions::default();
        assert_eq!(options.strategy, GenerationStrategy::Thorough);
        assert_eq!(options.artifact_policy, ArtifactPolicy::Strict);
        assert!(options.critique);
    }

    #[test]
    fn test_fast_options_use_fallback_policy() {
        let options = PipelineOptions::fast();
        assert_eq!(options.artifact_policy, ArtifactPolicy::Fallback);
        assert!(!options.critique);
    }

    #[tokio::test]
    async fn test_failed_run_emits_error_stage() {
        // Empty mock queue under the strict policy: analysis and strategy
        // degrade to fallbacks, then theme negotiation fails the run
        let orchestrator = PipelineOrchestrator::new(
            Arc::new(MockGateway::new()),
            PipelineOptions::thorough(),
        );

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let business = BusinessData::minimal("B", "Cafe", "1 St", "555");

        let result = orchestrator
            .run(&business, move |event| {
                seen_clone.lock().unwrap().push(event.stage);
            })
            .await;

        assert!(result.is_err());
        let stages = seen.lock().unwrap();
        assert_eq!(*stages.last().unwrap(), PipelineStage::Error);
    }

    #[tokio::test]
    async fn test_mock_queue_untouched_until_generate() {
        let gateway = Arc::new(MockGateway::new());
        gateway.enqueue(MockCompletion::text("{}"));
        let _orchestrator =
            PipelineOrchestrator::new(gateway.clone(), PipelineOptions::thorough());
        assert_eq!(gateway.remaining_responses(), 1);
    }
}
