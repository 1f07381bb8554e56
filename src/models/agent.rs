use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Available,
    Online,
    Busy,
    Offline,
    #[serde(other)]
    Unknown,
}

impl AgentStatus {
    /// Statuses an online agent may hold and still be offered for dispatch.
    pub fn is_dispatchable(self) -> bool {
        matches!(
            self,
            AgentStatus::Available | AgentStatus::Online | AgentStatus::Busy
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bicycle,
    Scooter,
    Motorcycle,
    Car,
    Van,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAgent {
    pub id: Uuid,
    pub name: String,
    pub location: Option<GeoPoint>,
    pub online: bool,
    pub status: AgentStatus,
    pub vehicle_type: Option<VehicleType>,
    pub rating: Option<f64>,
    pub phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}
