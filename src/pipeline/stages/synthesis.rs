//! Synthesis stage
//!
//! The most failure-prone stage: it depends on one or two independent
//! free-form generations succeeding. The artifact policy decides whether an
//! invalid generation is terminal ([`ArtifactPolicy::Strict`]) or replaced by
//! the deterministic template and category theme ([`ArtifactPolicy::Fallback`]).

use crate::extract::extract_json_str;
use crate::gateway::{CompletionGateway, CompletionRequest};
use crate::pipeline::render::{is_complete_html, render_page};
use crate::pipeline::stages::strategy::fallback_strategy;
use crate::pipeline::theme::{Layout, Theme};
use crate::pipeline::types::{AnalysisResult, BusinessData, ContactInfo, FinalContent, StrategyResult};
use crate::pipeline::{prompts, PipelineError};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

const HTML_TEMPERATURE: f32 = 0.9;
const HTML_MAX_TOKENS: u32 = 8192;
const THEME_TEMPERATURE: f32 = 0.4;
const THEME_MAX_TOKENS: u32 = 1024;

/// What to do when a generated artifact fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactPolicy {
    /// Invalid HTML or missing theme/layout keys fail the pipeline run
    Strict,
    /// Invalid artifacts are replaced by the deterministic template and
    /// category theme
    Fallback,
}

/// Runs full synthesis: HTML generation plus theme/layout negotiation
pub async fn synthesize_full(
    gateway: &dyn CompletionGateway,
    business: &BusinessData,
    analysis: &AnalysisResult,
    strategy: &StrategyResult,
    policy: ArtifactPolicy,
) -> Result<FinalContent, PipelineError> {
    let copy = merge_copy(business, strategy);

    let (theme, layout) = negotiate_theme(gateway, business, &copy, policy).await?;

    let html_request = CompletionRequest::prompt(
        prompts::HTML_SYSTEM_PROMPT,
        prompts::html_prompt(business, analysis, &copy),
    )
    .with_temperature(HTML_TEMPERATURE)
    .with_max_tokens(HTML_MAX_TOKENS);

    let response = gateway.complete(html_request).await?;
    let html_document = accept_html(business, &copy, &theme, &layout, response.content, policy)?;

    assemble(business, copy, theme, layout, html_document)
}

/// Runs fast synthesis: one HTML call, theme computed locally from the
/// business category, template fallback on invalid HTML
pub async fn synthesize_fast(
    gateway: &dyn CompletionGateway,
    business: &BusinessData,
    analysis: &AnalysisResult,
    strategy: &StrategyResult,
) -> Result<FinalContent, PipelineError> {
    let copy = merge_copy(business, strategy);
    let theme = Theme::for_category(&business.category);
    let layout = Layout::default();

    let html_request = CompletionRequest::prompt(
        prompts::HTML_SYSTEM_PROMPT,
        prompts::html_prompt(business, analysis, &copy),
    )
    .with_temperature(HTML_TEMPERATURE)
    .with_max_tokens(HTML_MAX_TOKENS);

    let response = gateway.complete(html_request).await?;
    let html_document = accept_html(
        business,
        &copy,
        &theme,
        &layout,
        response.content,
        ArtifactPolicy::Fallback,
    )?;

    assemble(business, copy, theme, layout, html_document)
}

fn accept_html(
    business: &BusinessData,
    copy: &StrategyResult,
    theme: &Theme,
    layout: &Layout,
    candidate: String,
    policy: ArtifactPolicy,
) -> Result<String, PipelineError> {
    let candidate = strip_code_fences(candidate);

    if is_complete_html(&candidate) {
        return Ok(candidate);
    }

    match policy {
        ArtifactPolicy::Strict => Err(PipelineError::InvalidHtml {
            reason: "missing <html>, <body>, or </html>".to_string(),
        }),
        ArtifactPolicy::Fallback => {
            warn!(
                business = %business.name,
                "Generated HTML was not a complete document, rendering template instead"
            );
            Ok(render_page(business, copy, theme, layout))
        }
    }
}

// Models often wrap the document in a markdown fence despite instructions
fn strip_code_fences(text: String) -> String {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```html").or_else(|| trimmed.strip_prefix("```")) {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim().to_string();
        }
    }
    text
}

async fn negotiate_theme(
    gateway: &dyn CompletionGateway,
    business: &BusinessData,
    copy: &StrategyResult,
    policy: ArtifactPolicy,
) -> Result<(Theme, Layout), PipelineError> {
    let request = CompletionRequest::prompt(
        prompts::THEME_SYSTEM_PROMPT,
        prompts::theme_prompt(business, copy),
    )
    .with_temperature(THEME_TEMPERATURE)
    .with_max_tokens(THEME_MAX_TOKENS);

    let response = gateway.complete(request).await?;

    match parse_theme_layout(&response.content) {
        Ok(pair) => Ok(pair),
        Err(missing) => match policy {
            ArtifactPolicy::Strict => Err(PipelineError::MissingThemeOrLayout { missing }),
            ArtifactPolicy::Fallback => {
                warn!(
                    business = %business.name,
                    missing = %missing,
                    "Theme negotiation failed, using category default"
                );
                Ok((Theme::for_category(&business.category), Layout::default()))
            }
        },
    }
}

fn parse_theme_layout(raw: &str) -> Result<(Theme, Layout), String> {
    let json_str = extract_json_str(raw).map_err(|_| "theme and layout".to_string())?;
    let value: Value =
        serde_json::from_str(&json_str).map_err(|_| "theme and layout".to_string())?;

    let theme_value = value.get("theme").cloned().ok_or_else(|| "theme".to_string())?;
    let layout_value = value
        .get("layout")
        .cloned()
        .ok_or_else(|| "layout".to_string())?;

    let theme: Theme = serde_json::from_value(theme_value).map_err(|_| "theme".to_string())?;
    let layout: Layout = serde_json::from_value(layout_value).map_err(|_| "layout".to_string())?;

    Ok((theme, layout))
}

/// Substitutes business-derived defaults for any incomplete strategy fields
fn merge_copy(business: &BusinessData, strategy: &StrategyResult) -> StrategyResult {
    let defaults = fallback_strategy(business);
    let pick = |value: &str, default: String| {
        if value.trim().is_empty() {
            default
        } else {
            value.to_string()
        }
    };

    StrategyResult {
        headline: pick(&strategy.headline, defaults.headline),
        subheadline: pick(&strategy.subheadline, defaults.subheadline),
        value_propositions: if strategy.value_propositions.is_empty() {
            defaults.value_propositions
        } else {
            strategy.value_propositions.clone()
        },
        services: if strategy.services.is_empty() {
            defaults.services
        } else {
            strategy.services.clone()
        },
        call_to_action: crate::pipeline::types::CallToAction {
            primary: pick(
                &strategy.call_to_action.primary,
                defaults.call_to_action.primary,
            ),
            secondary: pick(
                &strategy.call_to_action.secondary,
                defaults.call_to_action.secondary,
            ),
        },
        about_section: pick(&strategy.about_section, defaults.about_section),
        confidence: strategy.confidence,
    }
}

fn assemble(
    business: &BusinessData,
    copy: StrategyResult,
    theme: Theme,
    layout: Layout,
    html_document: String,
) -> Result<FinalContent, PipelineError> {
    let content = FinalContent {
        html_document,
        theme,
        layout,
        headline: copy.headline,
        subheadline: copy.subheadline,
        value_propositions: copy.value_propositions,
        services: copy.services,
        about_section: copy.about_section,
        call_to_action: copy.call_to_action,
        contact_info: ContactInfo::from_business(business),
        generated_at: Utc::now(),
    };

    content.validate()?;
    info!(
        business = %business.name,
        html_bytes = content.html_document.len(),
        "Synthesis complete"
    );
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockCompletion, MockGateway};
    use crate::pipeline::stages::analysis::fallback_analysis;
    use crate::pipeline::theme::ThemeStyle;

    fn business() -> BusinessData {
        BusinessData::minimal(
            "Delicious Pizza Place",
            "Restaurant",
            "123 Main St, Downtown, NY 10001",
            "+1 (555) 123-4567",
        )
    }

    fn strategy() -> StrategyResult {
        fallback_strategy(&business())
    }

    const VALID_HTML: &str = "<html><head></head><body><h1>Pizza</h1></body></html>";

    const VALID_THEME_JSON: &str = r##"{
        "theme": {
            "primary_color": "#c0392b", "secondary_color": "#2c3e50",
            "accent_color": "#f39c12", "background_color": "#fff",
            "text_color": "#222", "heading_font": "display",
            "body_font": "sans-serif", "style": "warm"
        },
        "layout": {
            "hero_style": "centered",
            "section_order": ["hero", "services", "about", "contact"]
        }
    }"##;

    fn full_gateway() -> MockGateway {
        let gateway = MockGateway::new();
        gateway.route("visual design", MockCompletion::text(VALID_THEME_JSON));
        gateway.route("Design a landing page", MockCompletion::text(VALID_HTML));
        gateway
    }

    #[tokio::test]
    async fn test_full_synthesis_happy_path() {
        let gateway = full_gateway();
        let content = synthesize_full(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
            ArtifactPolicy::Strict,
        )
        .await
        .unwrap();

        assert_eq!(content.html_document, VALID_HTML);
        assert_eq!(content.theme.style, ThemeStyle::Warm);
        assert_eq!(content.contact_info.phone, "+1 (555) 123-4567");
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_invalid_html() {
        let gateway = MockGateway::new();
        gateway.route("visual design", MockCompletion::text(VALID_THEME_JSON));
        gateway.route(
            "Design a landing page",
            MockCompletion::text("<div>just a fragment</div>"),
        );

        let result = synthesize_full(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
            ArtifactPolicy::Strict,
        )
        .await;

        assert!(matches!(result, Err(PipelineError::InvalidHtml { .. })));
    }

    #[tokio::test]
    async fn test_fallback_policy_renders_template_for_invalid_html() {
        let gateway = MockGateway::new();
        gateway.route("visual design", MockCompletion::text(VALID_THEME_JSON));
        gateway.route(
            "Design a landing page",
            MockCompletion::text("<div>just a fragment</div>"),
        );

        let content = synthesize_full(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
            ArtifactPolicy::Fallback,
        )
        .await
        .unwrap();

        assert!(is_complete_html(&content.html_document));
        assert!(content.html_document.contains("+1 (555) 123-4567"));
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_missing_layout_key() {
        let theme_only = r##"{"theme": {
            "primary_color": "#c0392b", "secondary_color": "#2c3e50",
            "accent_color": "#f39c12", "background_color": "#fff",
            "text_color": "#222", "heading_font": "display",
            "body_font": "sans-serif", "style": "warm"
        }}"##;

        let gateway = MockGateway::new();
        gateway.route("visual design", MockCompletion::text(theme_only));
        gateway.route("Design a landing page", MockCompletion::text(VALID_HTML));

        let result = synthesize_full(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
            ArtifactPolicy::Strict,
        )
        .await;

        match result {
            Err(PipelineError::MissingThemeOrLayout { missing }) => {
                assert_eq!(missing, "layout")
            }
            other => panic!("expected MissingThemeOrLayout, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_fallback_policy_uses_category_theme_for_missing_layout() {
        let gateway = MockGateway::new();
        gateway.route("visual design", MockCompletion::text(r#"{"theme": {}}"#));
        gateway.route("Design a landing page", MockCompletion::text(VALID_HTML));

        let content = synthesize_full(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
            ArtifactPolicy::Fallback,
        )
        .await
        .unwrap();

        assert_eq!(content.theme, Theme::for_category("Restaurant"));
        assert_eq!(content.layout, Layout::default());
    }

    #[tokio::test]
    async fn test_fast_synthesis_uses_local_theme_and_one_call() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(VALID_HTML));

        let content = synthesize_fast(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
        )
        .await
        .unwrap();

        assert_eq!(content.theme, Theme::for_category("Restaurant"));
        assert_eq!(gateway.remaining_responses(), 0);
        assert_eq!(gateway.call_log().len(), 2); // one dispatch, one resolve
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::error(GatewayError::Network {
            message: "connection refused".to_string(),
        }));

        let result = synthesize_fast(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
        )
        .await;

        assert!(matches!(result, Err(PipelineError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_fenced_html_is_unwrapped() {
        let gateway = MockGateway::new();
        gateway.enqueue(MockCompletion::text(format!("```html\n{}\n```", VALID_HTML)));

        let content = synthesize_fast(
            &gateway,
            &business(),
            &fallback_analysis(&business()),
            &strategy(),
        )
        .await
        .unwrap();

        assert_eq!(content.html_document, VALID_HTML);
    }

    #[test]
    fn test_merge_substitutes_empty_fields() {
        let mut partial = strategy();
        partial.headline = String::new();
        partial.services.clear();

        let merged = merge_copy(&business(), &partial);
        assert!(merged.headline.contains("Delicious Pizza Place"));
        assert!(!merged.services.is_empty());
    }
}
