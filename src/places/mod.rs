//! Place search gateway
//!
//! Populates [`BusinessData`](crate::pipeline::BusinessData) from a place
//! search/details API before the pipeline runs. Not part of the generation
//! core; the pipeline never calls back into this module.

mod http;
mod mock;

pub use http::HttpPlaceGateway;
pub use mock::MockPlaceGateway;

use crate::gateway::GatewayError;
use crate::pipeline::BusinessData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One hit from a text search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f64, f64)>,
}

/// Extra fields available from a details lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

/// External place search/details endpoint
#[async_trait]
pub trait PlaceGateway: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSummary>, GatewayError>;

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, GatewayError>;

    fn name(&self) -> &str;
}

impl BusinessData {
    /// Builds a pipeline input record from a search hit and its details
    pub fn from_place(summary: &PlaceSummary, details: &PlaceDetails) -> Self {
        Self {
            name: summary.name.clone(),
            category: summary.category.clone(),
            description: String::new(),
            address: summary.address.clone(),
            phone: details.phone.clone().unwrap_or_default(),
            email: None,
            website: details.website.clone(),
            rating: summary.rating,
            review_count: summary.review_count,
            opening_hours: details.opening_hours.clone(),
            photos: Vec::new(),
            social_links: Vec::new(),
        }
    }
}
