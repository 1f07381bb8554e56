use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub location: Option<GeoPoint>,
}

/// A restaurant whose coordinate is known, usable as an order's pickup leg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickupSite {
    pub restaurant_id: Uuid,
    pub name: String,
    pub location: GeoPoint,
}

impl Restaurant {
    pub fn pickup_site(&self) -> Option<PickupSite> {
        self.location.map(|location| PickupSite {
            restaurant_id: self.id,
            name: self.name.clone(),
            location,
        })
    }
}
