//! Pipeline data model
//!
//! Records flow strictly forward through the pipeline: [`BusinessData`] →
//! [`AnalysisResult`] → [`StrategyResult`] → [`FinalContent`]. Each stage's
//! output is read-only input to the next; nothing here is mutated after
//! creation.

use super::theme::{Layout, Theme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_confidence() -> f32 {
    50.0
}

/// Input record describing the business a page is generated for
///
/// Immutable once handed to the pipeline; owned by the caller (CLI input or a
/// place-search result).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessData {
    pub name: String,
    /// Business category, e.g. "Restaurant" or "Hair Salon"
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<String>,
}

impl BusinessData {
    /// Minimal record with only the required fields populated
    pub fn minimal(
        name: impl Into<String>,
        category: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: String::new(),
            address: address.into(),
            phone: phone.into(),
            email: None,
            website: None,
            rating: None,
            review_count: None,
            opening_hours: None,
            photos: Vec::new(),
            social_links: Vec::new(),
        }
    }
}

/// Market/positioning analysis produced by the first stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub target_market: String,
    pub competitive_edge: String,
    #[serde(default)]
    pub value_drivers: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub emotional_triggers: String,
    /// Advisory 0-100, no enforced meaning beyond display
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}

/// One service the business offers, as marketed on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

/// Page copy produced by the second stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub value_propositions: Vec<String>,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
    pub call_to_action: CallToAction,
    #[serde(default)]
    pub about_section: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

/// Contact details denormalized into the final artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: String,
}

impl ContactInfo {
    pub fn from_business(business: &BusinessData) -> Self {
        Self {
            phone: business.phone.clone(),
            email: business.email.clone(),
            website: business.website.clone(),
            address: business.address.clone(),
        }
    }
}

/// The complete generated-page artifact returned by one pipeline run
///
/// All-or-nothing: a pipeline run either produces a `FinalContent` that
/// passes [`FinalContent::validate`] or terminates with an error. Persisted
/// verbatim by the page store; never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalContent {
    /// Full HTML/CSS document
    pub html_document: String,
    pub theme: Theme,
    pub layout: Layout,
    // Denormalized copy for non-HTML rendering paths
    pub headline: String,
    pub subheadline: String,
    pub value_propositions: Vec<String>,
    pub services: Vec<ServiceOffering>,
    pub about_section: String,
    pub call_to_action: CallToAction,
    pub contact_info: ContactInfo,
    pub generated_at: DateTime<Utc>,
}

impl FinalContent {
    /// Checks the all-or-nothing contract: every required field is non-empty
    pub fn validate(&self) -> Result<(), super::PipelineError> {
        let check = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(super::PipelineError::IncompleteContent { field })
            } else {
                Ok(())
            }
        };

        check(&self.html_document, "html_document")?;
        check(&self.headline, "headline")?;
        check(&self.subheadline, "subheadline")?;
        check(&self.about_section, "about_section")?;
        check(&self.call_to_action.primary, "call_to_action.primary")?;
        check(&self.contact_info.phone, "contact_info.phone")?;
        check(&self.contact_info.address, "contact_info.address")?;

        if self.services.is_empty() {
            return Err(super::PipelineError::IncompleteContent { field: "services" });
        }

        Ok(())
    }
}

/// Transient progress notification streamed to the caller during one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: PipelineStage,
    /// 0-100
    pub progress: u8,
    pub message: String,
}

/// State machine for one pipeline run
///
/// `Error` is an absorbing state reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Analyzing,
    Strategizing,
    Synthesizing,
    Completed,
    Error,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Analyzing => "analyzing",
            PipelineStage::Strategizing => "strategizing",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Completed => "completed",
            PipelineStage::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Item on the progress stream: zero or more `Progress` events followed by
/// exactly one terminal `Completed` or `Failed`, then stream close
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Progress(ProgressEvent),
    Completed(Box<FinalContent>),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::theme::{Layout, Theme};

    pub(crate) fn sample_business() -> BusinessData {
        BusinessData {
            rating: Some(4.5),
            ..BusinessData::minimal(
                "Delicious Pizza Place",
                "Restaurant",
                "123 Main St, Downtown, NY 10001",
                "+1 (555) 123-4567",
            )
        }
    }

    fn complete_content() -> FinalContent {
        FinalContent {
            html_document: "<html><body></body></html>".to_string(),
            theme: Theme::for_category("Restaurant"),
            layout: Layout::default(),
            headline: "Headline".to_string(),
            subheadline: "Sub".to_string(),
            value_propositions: vec!["Fast".to_string()],
            services: vec![ServiceOffering {
                name: "Dine-in".to_string(),
                description: "Tables".to_string(),
                features: vec![],
            }],
            about_section: "About".to_string(),
            call_to_action: CallToAction {
                primary: "Call now".to_string(),
                secondary: "Visit us".to_string(),
            },
            contact_info: ContactInfo::from_business(&sample_business()),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_minimal_business() {
        let business = BusinessData::minimal("Shop", "Retail", "1 Ave", "555");
        assert_eq!(business.name, "Shop");
        assert!(business.email.is_none());
        assert!(business.photos.is_empty());
    }

    #[test]
    fn test_analysis_parses_with_defaults() {
        let json = r#"{"target_market": "locals", "competitive_edge": "speed"}"#;
        let analysis: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.confidence, 50.0);
        assert!(analysis.value_drivers.is_empty());
    }

    #[test]
    fn test_strategy_requires_headline() {
        let json = r#"{"call_to_action": {"primary": "Go"}}"#;
        assert!(serde_json::from_str::<StrategyResult>(json).is_err());
    }

    #[test]
    fn test_contact_info_copies_verbatim() {
        let business = sample_business();
        let contact = ContactInfo::from_business(&business);
        assert_eq!(contact.phone, "+1 (555) 123-4567");
        assert_eq!(contact.address, "123 Main St, Downtown, NY 10001");
    }

    #[test]
    fn test_validate_complete_content() {
        assert!(complete_content().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_headline() {
        let mut content = complete_content();
        content.headline = "  ".to_string();
        assert!(content.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_services() {
        let mut content = complete_content();
        content.services.clear();
        assert!(content.validate().is_err());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Analyzing.to_string(), "analyzing");
        assert_eq!(PipelineStage::Error.to_string(), "error");
    }

    #[test]
    fn test_final_content_round_trips_through_json() {
        let content = complete_content();
        let json = serde_json::to_string(&content).unwrap();
        let parsed: FinalContent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.headline, content.headline);
        assert_eq!(parsed.services.len(), 1);
    }
}
