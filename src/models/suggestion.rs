use serde::{Deserialize, Serialize};

use crate::models::agent::DeliveryAgent;

/// Coarse recommendation bucket shown to the dispatcher.
///
/// `Standard` is the fallback tier. It is serialized as `"available"`,
/// the name dashboards already expect for it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTier {
    Fastest,
    Nearby,
    #[serde(rename = "available")]
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSuggestion {
    pub agent: DeliveryAgent,
    pub distance_to_pickup_km: f64,
    pub distance_to_drop_km: f64,
    pub total_distance_km: f64,
    pub estimated_minutes: u32,
    pub tier: SuggestionTier,
    pub restaurant_name: String,
}
