//! Output formatting for the CLI
//!
//! JSON for machine consumption, plain text for humans. HTML documents are
//! elided from human summaries and printed separately or written to a file.

use anyhow::{Context, Result};
use serde_json::json;

use crate::pipeline::FinalContent;
use crate::places::PlaceSummary;
use crate::store::StoredPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a generated page. In human format the HTML document itself is
    /// summarized by size rather than dumped.
    pub fn format_content(&self, content: &FinalContent) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(content)
                .context("Failed to serialize generated content to JSON"),
            OutputFormat::Human => Ok(self.format_content_human(content)),
        }
    }

    pub fn format_pages(&self, pages: &[StoredPage]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(pages)
                .context("Failed to serialize page list to JSON"),
            OutputFormat::Human => {
                if pages.is_empty() {
                    return Ok("No stored pages.".to_string());
                }
                let mut out = String::new();
                out.push_str(&format!("{} stored page(s):\n\n", pages.len()));
                for page in pages {
                    out.push_str(&format!(
                        "  {}  {}  ({}, created {})\n",
                        page.id,
                        page.business.name,
                        page.business.category,
                        page.created_at.format("%Y-%m-%d %H:%M UTC"),
                    ));
                }
                Ok(out)
            }
        }
    }

    pub fn format_page(&self, page: &StoredPage) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(page)
                .context("Failed to serialize stored page to JSON"),
            OutputFormat::Human => {
                let mut out = String::new();
                out.push_str(&format!("Page {}\n", page.id));
                out.push_str(&format!("  Business: {}\n", page.business.name));
                out.push_str(&format!("  Created:  {}\n", page.created_at.to_rfc3339()));
                out.push_str(&format!("  Updated:  {}\n\n", page.updated_at.to_rfc3339()));
                out.push_str(&self.format_content_human(&page.content));
                Ok(out)
            }
        }
    }

    pub fn format_places(&self, places: &[PlaceSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(places)
                .context("Failed to serialize search results to JSON"),
            OutputFormat::Human => {
                if places.is_empty() {
                    return Ok("No matches.".to_string());
                }
                let mut out = String::new();
                for place in places {
                    let rating = match (place.rating, place.review_count) {
                        (Some(r), Some(n)) => format!("  {:.1}★ ({} reviews)", r, n),
                        (Some(r), None) => format!("  {:.1}★", r),
                        _ => String::new(),
                    };
                    out.push_str(&format!(
                        "  {}  {} [{}] - {}{}\n",
                        place.place_id, place.name, place.category, place.address, rating
                    ));
                }
                Ok(out)
            }
        }
    }

    pub fn format_health(&self, gateway_name: &str, model: &str, healthy: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "gateway": gateway_name,
                "model": model,
                "healthy": healthy,
            }))
            .context("Failed to serialize health status to JSON"),
            OutputFormat::Human => Ok(format!(
                "{} {} (model: {})",
                if healthy { "✓" } else { "✗" },
                gateway_name,
                model
            )),
        }
    }

    fn format_content_human(&self, content: &FinalContent) -> String {
        let mut out = String::new();
        out.push_str(&format!("Headline:    {}\n", content.headline));
        out.push_str(&format!("Subheadline: {}\n", content.subheadline));
        out.push_str(&format!(
            "Theme:       {:?} ({} / {})\n",
            content.theme.style, content.theme.primary_color, content.theme.accent_color
        ));
        out.push_str(&format!("Layout:      {:?} hero\n", content.layout.hero_style));
        if !content.value_propositions.is_empty() {
            out.push_str("Value propositions:\n");
            for vp in &content.value_propositions {
                out.push_str(&format!("  - {}\n", vp));
            }
        }
        if !content.services.is_empty() {
            out.push_str("Services:\n");
            for service in &content.services {
                out.push_str(&format!("  - {}\n", service.name));
            }
        }
        out.push_str(&format!(
            "Call to action: {}\n",
            content.call_to_action.primary
        ));
        out.push_str(&format!(
            "HTML document:  {} bytes\n",
            content.html_document.len()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::render_page;
    use crate::pipeline::stages::strategy::fallback_strategy;
    use crate::pipeline::theme::{Layout, Theme};
    use crate::pipeline::{BusinessData, ContactInfo};
    use chrono::Utc;

    fn sample_content() -> FinalContent {
        let business = BusinessData::minimal(
            "Delicious Pizza Place",
            "Restaurant",
            "123 Main St",
            "+1 (555) 123-4567",
        );
        let strategy = fallback_strategy(&business);
        let theme = Theme::for_category(&business.category);
        let layout = Layout::default();
        FinalContent {
            html_document: render_page(&business, &strategy, &theme, &layout),
            theme,
            layout,
            headline: strategy.headline.clone(),
            subheadline: strategy.subheadline.clone(),
            value_propositions: strategy.value_propositions.clone(),
            services: strategy.services.clone(),
            about_section: strategy.about_section.clone(),
            call_to_action: strategy.call_to_action.clone(),
            contact_info: ContactInfo::from_business(&business),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_content_round_trips() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_content(&sample_content()).unwrap();
        let parsed: FinalContent = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.headline, sample_content().headline);
    }

    #[test]
    fn test_human_content_elides_html() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_content(&sample_content()).unwrap();
        assert!(output.contains("Headline:"));
        assert!(output.contains("bytes"));
        assert!(!output.contains("<html"));
    }

    #[test]
    fn test_empty_page_list() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_pages(&[]).unwrap();
        assert_eq!(output, "No stored pages.");
    }

    #[test]
    fn test_health_human() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let ok = formatter.format_health("openai", "gpt-4o-mini", true).unwrap();
        assert!(ok.starts_with('✓'));
        let bad = formatter.format_health("openai", "gpt-4o-mini", false).unwrap();
        assert!(bad.starts_with('✗'));
    }
}
