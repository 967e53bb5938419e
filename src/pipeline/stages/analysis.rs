//! Business analysis stage
//!
//! One gateway call at moderate temperature, parsed through the extractor
//! with a business-derived fallback, plus an optional critique pass that asks
//! the model to refine its own draft. This stage never fails a run: gateway
//! errors and malformed responses both degrade to the fallback.

use crate::extract::{extract_or_fallback, FALLBACK_CONFIDENCE};
use crate::gateway::{CompletionGateway, CompletionRequest};
use crate::pipeline::prompts;
use crate::pipeline::types::{AnalysisResult, BusinessData};
use tracing::{debug, info, warn};

const ANALYSIS_TEMPERATURE: f32 = 0.7;
const ANALYSIS_MAX_TOKENS: u32 = 1024;

/// Fallback analysis derived purely from the input record
pub fn fallback_analysis(business: &BusinessData) -> AnalysisResult {
    AnalysisResult {
        target_market: format!("customers of {}", business.category.to_lowercase()),
        competitive_edge: format!("a trusted local {}", business.category.to_lowercase()),
        value_drivers: vec![
            "convenient location".to_string(),
            "personal service".to_string(),
        ],
        pain_points: vec!["finding a reliable local option".to_string()],
        emotional_triggers: "trust and familiarity".to_string(),
        confidence: FALLBACK_CONFIDENCE as f32,
        reasoning: "derived from business profile without model analysis".to_string(),
    }
}

/// Runs the analysis stage
///
/// `requirements` is optional free text from the business owner. With
/// `critique` set, a second call asks the model to refine the first draft;
/// a failed critique keeps the draft rather than failing the stage.
pub async fn analyze_business(
    gateway: &dyn CompletionGateway,
    business: &BusinessData,
    requirements: Option<&str>,
    critique: bool,
) -> AnalysisResult {
    let request = CompletionRequest::prompt(
        prompts::ANALYSIS_SYSTEM_PROMPT,
        prompts::analysis_prompt(business, requirements),
    )
    .with_temperature(ANALYSIS_TEMPERATURE)
    .with_max_tokens(ANALYSIS_MAX_TOKENS);

    let response = match gateway.complete(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(
                business = %business.name,
                error = %e,
                "Analysis call failed, using business-derived fallback"
            );
            return fallback_analysis(business);
        }
    };

    let extracted = extract_or_fallback(&response.content, fallback_analysis(business));

    if extracted.from_fallback {
        warn!(
            business = %business.name,
            "Analysis response had no parsable JSON, using business-derived fallback"
        );
        return extracted.value;
    }

    let draft = extracted.value;
    info!(
        business = %business.name,
        confidence = draft.confidence,
        "Analysis stage complete"
    );

    if !critique {
        return draft;
    }

    refine_analysis(gateway, draft).await
}

async fn refine_analysis(
    gateway: &dyn CompletionGateway,
    draft: AnalysisResult,
) -> AnalysisResult {
    let draft_json = match serde_json::to_string_pretty(&draft) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize analysis draft for critique: {}", e);
            return draft;
        }
    };

    let request = CompletionRequest::prompt(
        prompts::CRITIQUE_SYSTEM_PROMPT,
        prompts::critique_prompt(&draft_json),
    )
    .with_temperature(ANALYSIS_TEMPERATURE)
    .with_max_tokens(ANALYSIS_MAX_TOKENS);

    let response = match gateway.complete(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Critique call failed, keeping original draft");
            return draft;
        }
    };

    let refined = extract_or_fallback(&response.content, draft);

    if refined.from_fallback {
        debug!("Critique response unparsable, keeping original draft");
    }

    refined.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockCompletion, MockGateway};

    fn business() -> BusinessData {
        BusinessData::minimal("Corner Barbers", "Barber Shop", "5 High St", "555-0100")
    }

    const VALID_ANALYSIS: &str = r#"{
        "target_market": "local professionals",
        "competitive_edge": "walk-ins welcome",
        "value_drivers": ["quick cuts"],
        "pain_points": ["long waits elsewhere"],
        "emotional_triggers": "looking sharp",
        "confidence": 85,
        "reasoning": "established shop"
    }"#;

    #[tokio::test]
    async fn test_analysis_parses_model_output() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_ANALYSIS));

        let analysis = analyze_business(&gateway, &business(), None, false).await;

        assert_eq!(analysis.target_market, "local professionals");
        assert_eq!(analysis.confidence, 85.0);
    }

    #[tokio::test]
    async fn test_analysis_falls_back_on_invalid_json() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text("I could not produce JSON, sorry."));

        let analysis = analyze_business(&gateway, &business(), None, false).await;

        assert_eq!(analysis.target_market, "customers of barber shop");
        assert_eq!(analysis.confidence, FALLBACK_CONFIDENCE as f32);
    }

    #[tokio::test]
    async fn test_analysis_falls_back_on_gateway_error() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::error(GatewayError::Timeout {
            seconds: 30,
        }));

        let analysis = analyze_business(&gateway, &business(), None, false).await;
        assert_eq!(analysis.confidence, FALLBACK_CONFIDENCE as f32);
        assert_eq!(analysis.target_market, "customers of barber shop");
    }

    #[tokio::test]
    async fn test_critique_refines_draft() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_ANALYSIS));
        gateway.enqueue(MockCompletion::text(
            VALID_ANALYSIS.replace("local professionals", "busy commuters"),
        ));

        let analysis = analyze_business(&gateway, &business(), None, true).await;

        assert_eq!(analysis.target_market, "busy commuters");
        assert_eq!(gateway.remaining_responses(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_critique_keeps_draft() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_ANALYSIS));
        gateway.enqueue(MockCompletion::text("no json in this critique"));

        let analysis = analyze_business(&gateway, &business(), None, true).await;

        assert_eq!(analysis.target_market, "local professionals");
    }

    #[tokio::test]
    async fn test_critique_error_keeps_draft() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_ANALYSIS));
        gateway.enqueue(MockCompletion::error(GatewayError::RateLimit {
            retry_after: Some(5),
        }));

        let analysis = analyze_business(&gateway, &business(), None, true).await;
        assert_eq!(analysis.target_market, "local professionals");
    }

    #[tokio::test]
    async fn test_critique_skipped_after_fallback() {
        // A fallback draft is not worth a critique call
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text("garbage"));

        let analysis = analyze_business(&gateway, &business(), None, true).await;

        assert_eq!(analysis.confidence, FALLBACK_CONFIDENCE as f32);
        assert_eq!(gateway.remaining_responses(), 0);
    }
}
