//! Theme and layout vocabularies
//!
//! The synthesis prompt constrains the model to these exact values; the same
//! vocabulary backs the deterministic category defaults used by the fast
//! strategy and the fallback artifact policy.

use serde::{Deserialize, Serialize};

/// Font pairing choices offered to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontChoice {
    Serif,
    SansSerif,
    Display,
    Handwritten,
    Monospace,
}

impl FontChoice {
    /// CSS font-family stack for this choice
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontChoice::Serif => "Georgia, 'Times New Roman', serif",
            FontChoice::SansSerif => "'Helvetica Neue', Arial, sans-serif",
            FontChoice::Display => "'Playfair Display', Georgia, serif",
            FontChoice::Handwritten => "'Pacifico', cursive",
            FontChoice::Monospace => "'Courier New', monospace",
        }
    }
}

/// Overall visual register of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStyle {
    Modern,
    Classic,
    Bold,
    Minimal,
    Warm,
}

/// Structured color/font description of the generated page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Hex color, e.g. "#c0392b"
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: FontChoice,
    pub body_font: FontChoice,
    pub style: ThemeStyle,
}

impl Theme {
    /// Deterministic default theme keyed by business category
    ///
    /// Matching is substring-based and case-insensitive; unknown categories
    /// get the professional default.
    pub fn for_category(category: &str) -> Self {
        let lower = category.to_lowercase();

        if lower.contains("restaurant") || lower.contains("cafe") || lower.contains("food") {
            Self {
                primary_color: "#c0392b".to_string(),
                secondary_color: "#2c3e50".to_string(),
                accent_color: "#f39c12".to_string(),
                background_color: "#fdf6ec".to_string(),
                text_color: "#2c3e50".to_string(),
                heading_font: FontChoice::Display,
                body_font: FontChoice::SansSerif,
                style: ThemeStyle::Warm,
            }
        } else if lower.contains("salon") || lower.contains("beauty") || lower.contains("spa") {
            Self {
                primary_color: "#8e44ad".to_string(),
                secondary_color: "#34495e".to_string(),
                accent_color: "#e8b4bc".to_string(),
                background_color: "#faf5fa".to_string(),
                text_color: "#33303b".to_string(),
                heading_font: FontChoice::Display,
                body_font: FontChoice::Serif,
                style: ThemeStyle::Minimal,
            }
        } else if lower.contains("gym") || lower.contains("fitness") || lower.contains("sport") {
            Self {
                primary_color: "#e74c3c".to_string(),
                secondary_color: "#1b1b1e".to_string(),
                accent_color: "#f1c40f".to_string(),
                background_color: "#ffffff".to_string(),
                text_color: "#1b1b1e".to_string(),
                heading_font: FontChoice::SansSerif,
                body_font: FontChoice::SansSerif,
                style: ThemeStyle::Bold,
            }
        } else if lower.contains("medical")
            || lower.contains("dental")
            || lower.contains("clinic")
            || lower.contains("health")
        {
            Self {
                primary_color: "#2980b9".to_string(),
                secondary_color: "#2c3e50".to_string(),
                accent_color: "#1abc9c".to_string(),
                background_color: "#f4f9fc".to_string(),
                text_color: "#2c3e50".to_string(),
                heading_font: FontChoice::SansSerif,
                body_font: FontChoice::SansSerif,
                style: ThemeStyle::Modern,
            }
        } else if lower.contains("shop") || lower.contains("store") || lower.contains("retail") {
            Self {
                primary_color: "#d35400".to_string(),
                secondary_color: "#2c3e50".to_string(),
                accent_color: "#27ae60".to_string(),
                background_color: "#fffdf9".to_string(),
                text_color: "#2c3e50".to_string(),
                heading_font: FontChoice::SansSerif,
                body_font: FontChoice::SansSerif,
                style: ThemeStyle::Modern,
            }
        } else {
            // Professional default for law firms, agencies, everything else
            Self {
                primary_color: "#2c3e50".to_string(),
                secondary_color: "#7f8c8d".to_string(),
                accent_color: "#2980b9".to_string(),
                background_color: "#ffffff".to_string(),
                text_color: "#2c3e50".to_string(),
                heading_font: FontChoice::Serif,
                body_font: FontChoice::SansSerif,
                style: ThemeStyle::Classic,
            }
        }
    }
}

/// Page sections the layout can order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Services,
    About,
    Testimonials,
    Contact,
}

/// Hero presentation shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeroStyle {
    FullBleed,
    Split,
    Centered,
}

/// Structured section-ordering description of the generated page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub hero_style: HeroStyle,
    pub section_order: Vec<SectionKind>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            hero_style: HeroStyle::Centered,
            section_order: vec![
                SectionKind::Hero,
                SectionKind::Services,
                SectionKind::About,
                SectionKind::Contact,
            ],
        }
    }
}
