//! Content strategy stage
//!
//! Same shape as the analysis stage: one primary call, optional critique,
//! extractor-based parsing with a business-derived fallback. Never fails a
//! run; gateway errors degrade to the fallback copy.

use crate::extract::{extract_or_fallback, FALLBACK_CONFIDENCE};
use crate::gateway::{CompletionGateway, CompletionRequest};
use crate::pipeline::prompts;
use crate::pipeline::types::{
    AnalysisResult, BusinessData, CallToAction, ServiceOffering, StrategyResult,
};
use tracing::{debug, info, warn};

const STRATEGY_TEMPERATURE: f32 = 0.7;
const STRATEGY_MAX_TOKENS: u32 = 2048;

/// Fallback copy derived purely from the input record
pub fn fallback_strategy(business: &BusinessData) -> StrategyResult {
    let category = business.category.to_lowercase();
    StrategyResult {
        headline: format!("Welcome to {}", business.name),
        subheadline: format!("Your local {} in {}", category, short_locality(&business.address)),
        value_propositions: vec![
            "Friendly, personal service".to_string(),
            "Conveniently located".to_string(),
        ],
        services: vec![ServiceOffering {
            name: business.category.clone(),
            description: format!("Quality {} services for the neighborhood", category),
            features: Vec::new(),
        }],
        call_to_action: CallToAction {
            primary: "Call Us Today".to_string(),
            secondary: "Visit Us".to_string(),
        },
        about_section: format!(
            "{} is a {} located at {}. Get in touch at {}.",
            business.name, category, business.address, business.phone
        ),
        confidence: FALLBACK_CONFIDENCE as f32,
    }
}

// First address segment reads as the locality often enough for fallback copy
fn short_locality(address: &str) -> String {
    address
        .split(',')
        .next()
        .unwrap_or(address)
        .trim()
        .to_string()
}

/// Runs the content strategy stage
pub async fn build_strategy(
    gateway: &dyn CompletionGateway,
    business: &BusinessData,
    analysis: &AnalysisResult,
    critique: bool,
) -> StrategyResult {
    let request = CompletionRequest::prompt(
        prompts::STRATEGY_SYSTEM_PROMPT,
        prompts::strategy_prompt(business, analysis),
    )
    .with_temperature(STRATEGY_TEMPERATURE)
    .with_max_tokens(STRATEGY_MAX_TOKENS);

    let response = match gateway.complete(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(
                business = %business.name,
                error = %e,
                "Strategy call failed, using business-derived fallback"
            );
            return fallback_strategy(business);
        }
    };

    let extracted = extract_or_fallback(&response.content, fallback_strategy(business));

    if extracted.from_fallback {
        warn!(
            business = %business.name,
            "Strategy response had no parsable JSON, using business-derived fallback"
        );
        return extracted.value;
    }

    let draft = extracted.value;
    info!(
        business = %business.name,
        services = draft.services.len(),
        confidence = draft.confidence,
        "Strategy stage complete"
    );

    if !critique {
        return draft;
    }

    refine_strategy(gateway, draft).await
}

async fn refine_strategy(
    gateway: &dyn CompletionGateway,
    draft: StrategyResult,
) -> StrategyResult {
    let draft_json = match serde_json::to_string_pretty(&draft) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize strategy draft for critique: {}", e);
            return draft;
        }
    };

    let request = CompletionRequest::prompt(
        prompts::CRITIQUE_SYSTEM_PROMPT,
        prompts::critique_prompt(&draft_json),
    )
    .with_temperature(STRATEGY_TEMPERATURE)
    .with_max_tokens(STRATEGY_MAX_TOKENS);

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
    use crate::pipeline::stages::analysis::fallback_analysis;

    fn business() -> BusinessData {
        BusinessData::minimal(
            "Delicious Pizza Place",
            "Restaurant",
            "123 Main St, Downtown, NY 10001",
            "+1 (555) 123-4567",
        )
    }

    const VALID_STRATEGY: &str = r#"{
        "headline": "Downtown's Wood-Fired Pizza",
        "subheadline": "Fresh from the oven on Main St",
        "value_propositions": ["Dough made daily"],
        "services": [{"name": "Dine-in", "description": "Cozy tables", "features": []}],
        "call_to_action": {"primary": "Order Now", "secondary": "See Menu"},
        "about_section": "A Main St favorite.",
        "confidence": 88
    }"#;

    #[tokio::test]
    async fn test_strategy_parses_model_output() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_STRATEGY));

        let strategy =
            build_strategy(&gateway, &business(), &fallback_analysis(&business()), false).await;

        assert_eq!(strategy.headline, "Downtown's Wood-Fired Pizza");
        assert_eq!(strategy.services.len(), 1);
    }

    #[tokio::test]
    async fn test_strategy_falls_back_on_invalid_json() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text("not json"));

        let strategy =
            build_strategy(&gateway, &business(), &fallback_analysis(&business()), false).await;

        assert!(strategy.headline.contains("Delicious Pizza Place"));
        assert_eq!(strategy.confidence, FALLBACK_CONFIDENCE as f32);
        assert!(!strategy.services.is_empty());
    }

    #[tokio::test]
    async fn test_strategy_falls_back_on_gateway_error() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::error(GatewayError::RateLimit {
            retry_after: Some(10),
        }));

        let strategy =
            build_strategy(&gateway, &business(), &fallback_analysis(&business()), false).await;
        assert!(strategy.headline.contains("Delicious Pizza Place"));
        assert_eq!(strategy.confidence, FALLBACK_CONFIDENCE as f32);
    }

    #[tokio::test]
    async fn test_fallback_mentions_locality() {
        let strategy = fallback_strategy(&business());
        assert!(strategy.subheadline.contains("123 Main St"));
        assert!(strategy.about_section.contains("+1 (555) 123-4567"));
    }

    #[tokio::test]
    async fn test_critique_pass() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_STRATEGY));
        gateway.enqueue(MockCompletion::text(
            VALID_STRATEGY.replace("Downtown's Wood-Fired Pizza", "The Best Slice on Main St"),
        ));

        let strategy =
            build_strategy(&gateway, &business(), &fallback_analysis(&business()), true).await;

        assert_eq!(strategy.headline, "The Best Slice on Main St");
    }
}
