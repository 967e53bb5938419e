//! In-memory place gateway for tests and offline runs

use super::{PlaceDetails, PlaceGateway, PlaceSummary};
use crate::gateway::GatewayError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned places from memory
pub struct MockPlaceGateway {
    places: Mutex<Vec<PlaceSummary>>,
    details: Mutex<HashMap<String, PlaceDetails>>,
}

impl MockPlaceGateway {
    pub fn new() -> Self {
        Self {
            places: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_place(&self, summary: PlaceSummary, details: PlaceDetails) {
        let id = summary.place_id.clone();
        self.places.lock().unwrap().push(summary);
        self.details.lock().unwrap().insert(id, details);
    }
}

impl Default for MockPlaceGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaceGateway for MockPlaceGateway {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSummary>, GatewayError> {
        let needle = query.to_lowercase();
        let hits = self
            .places
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
                    || p.address.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(hits)
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, GatewayError> {
        self.details
            .lock()
            .unwrap()
            .get(place_id)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                message: format!("unknown place id: {}", place_id),
                status_code: Some(404),
            })
    }

    fn name(&self) -> &str {
        "mock-places"
    }
}
