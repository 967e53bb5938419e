//! Prompt construction for the generation stages
//!
//! Each stage gets a fixed system prompt plus a user prompt built from the
//! business record and any prior stage output. System prompts pin the exact
//! JSON key schema so the extractor can parse responses into typed results.

use super::types::{AnalysisResult, BusinessData, StrategyResult};

/// System prompt for the business analysis stage
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a market analyst for small local businesses. Given a business profile, produce a positioning analysis.

Respond with a single JSON object and nothing else, using exactly these keys:
{
  "target_market": "who the ideal customers are",
  "competitive_edge": "what sets this business apart",
  "value_drivers": ["reason customers choose it", "..."],
  "pain_points": ["customer problem it solves", "..."],
  "emotional_triggers": "feelings the marketing should evoke",
  "confidence": 0-100,
  "reasoning": "brief justification"
}"#;

/// System prompt for the content strategy stage
pub const STRATEGY_SYSTEM_PROMPT: &str = r#"You are a conversion copywriter for local business landing pages. Given a business profile and a positioning analysis, write the page copy.

Never use generic phrasing that could apply to any business. Reference the specific business name, offerings, and location.

Respond with a single JSON object and nothing else, using exactly these keys:
{
  "headline": "main page headline",
  "subheadline": "supporting line under the headline",
  "value_propositions": ["short benefit statement", "..."],
  "services": [{"name": "...", "description": "...", "features": ["..."]}],
  "call_to_action": {"primary": "...", "secondary": "..."},
  "about_section": "two or three sentences about the business",
  "confidence": 0-100
}"#;

/// System prompt for the HTML synthesis call
pub const HTML_SYSTEM_PROMPT: &str = r#"You are a senior web designer. Produce one complete, self-contained HTML document for a business landing page: all CSS inline in a <style> block, no external assets, no JavaScript required for the page to render.

You have full creative freedom over visual design, but the document must open with <html>, contain a <body>, and close with </html>. Respond with the HTML document only, no commentary."#;

/// System prompt for the theme/layout negotiation call
pub const THEME_SYSTEM_PROMPT: &str = r##"You describe the visual design of a landing page as structured data.

Respond with a single JSON object and nothing else, of the shape:
{
  "theme": {
    "primary_color": "#hex", "secondary_color": "#hex", "accent_color": "#hex",
    "background_color": "#hex", "text_color": "#hex",
    "heading_font": one of "serif" | "sans-serif" | "display" | "handwritten" | "monospace",
    "body_font": same choices as heading_font,
    "style": one of "modern" | "classic" | "bold" | "minimal" | "warm"
  },
  "layout": {
    "hero_style": one of "full-bleed" | "split" | "centered",
    "section_order": array drawn from "hero" | "services" | "about" | "testimonials" | "contact"
  }
}
Both the "theme" and "layout" keys are required."##;

/// System prompt for critique/refinement passes
pub const CRITIQUE_SYSTEM_PROMPT: &str = r#"You are a demanding marketing director reviewing a draft. Improve specificity, cut filler, and keep the exact same JSON schema as the draft. Respond with the refined JSON object only."#;

fn business_profile(business: &BusinessData) -> String {
    let mut profile = format!(
        "Business: {}\nCategory: {}\nAddress: {}\nPhone: {}\n",
        business.name, business.category, business.address, business.phone
    );

    if !business.description.is_empty() {
        profile.push_str(&format!("Description: {}\n", business.description));
    }
    if let Some(email) = &business.email {
        profile.push_str(&format!("Email: {}\n", email));
    }
    if let Some(website) = &business.website {
        profile.push_str(&format!("Website: {}\n", website));
    }
    if let Some(rating) = business.rating {
        let reviews = business
            .review_count
            .map(|n| format!(" across {} reviews", n))
            .unwrap_or_default();
        profile.push_str(&format!("Rating: {:.1}/5{}\n", rating, reviews));
    }
    if let Some(hours) = &business.opening_hours {
        profile.push_str(&format!("Hours: {}\n", hours));
    }
    if !business.social_links.is_empty() {
        profile.push_str(&format!("Social: {}\n", business.social_links.join(", ")));
    }

    profile
}

/// User prompt for the analysis stage
pub fn analysis_prompt(business: &BusinessData, requirements: Option<&str>) -> String {
    let mut prompt = format!(
        "Analyze the market positioning of this business:\n\n{}",
        business_profile(business)
    );

    if let Some(requirements) = requirements {
        prompt.push_str(&format!("\nOwner requirements: {}\n", requirements));
    }

    prompt.push_str("\nDescribe the target market, competitive edge, value drivers, pain points, and emotional triggers.");
    prompt
}

/// User prompt for the strategy stage
pub fn strategy_prompt(business: &BusinessData, analysis: &AnalysisResult) -> String {
    format!(
        "Write landing page copy for this business:\n\n{}\n\
         Positioning analysis:\n\
         - Target market: {}\n\
         - Competitive edge: {}\n\
         - Value drivers: {}\n\
         - Pain points: {}\n\
         - Emotional triggers: {}\n\n\
         Produce the headline, subheadline, value propositions, services, call to action, and about section.",
        business_profile(business),
        analysis.target_market,
        analysis.competitive_edge,
        analysis.value_drivers.join("; "),
        analysis.pain_points.join("; "),
        analysis.emotional_triggers,
    )
}

/// User prompt for the HTML generation call
pub fn html_prompt(
    business: &BusinessData,
    analysis: &AnalysisResult,
    strategy: &StrategyResult,
) -> String {
    let services = strategy
        .services
        .iter()
        .map(|s| format!("- {}: {}", s.name, s.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Design a landing page for:\n\n{}\n\
         Target market: {}\n\n\
         Page copy to use verbatim:\n\
         Headline: {}\n\
         Subheadline: {}\n\
         Value propositions: {}\n\
         Services:\n{}\n\
         About: {}\n\
         Call to action: {} / {}\n\n\
         Include a contact section with the phone number and address exactly as given above.",
        business_profile(business),
        analysis.target_market,
        strategy.headline,
        strategy.subheadline,
        strategy.value_propositions.join("; "),
        services,
        strategy.about_section,
        strategy.call_to_action.primary,
        strategy.call_to_action.secondary,
    )
}

/// User prompt for the theme/layout call
pub fn theme_prompt(business: &BusinessData, strategy: &StrategyResult) -> String {
    format!(
        "Describe the visual design for a landing page of \"{}\" ({}), headline \"{}\". \
         Pick colors and fonts fitting the business category and a section order for the page.",
        business.name, business.category, strategy.headline
    )
}

/// User prompt for a critique pass over a prior JSON draft
pub fn critique_prompt(draft_json: &str) -> String {
    format!(
        "Refine this draft. Keep the same JSON schema, improve the content:\n\n{}",
        draft_json
    )
}
