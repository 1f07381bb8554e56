use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// A food item line on an order. The first line decides the pickup restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub restaurant_id: Uuid,
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub delivery_location: Option<GeoPoint>,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub assigned_agent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn pickup_restaurant_id(&self) -> Option<Uuid> {
        self.items.first().map(|item| item.restaurant_id)
    }

    pub fn is_assigned(&self) -> bool {
        self.status == OrderStatus::Assigned || self.assigned_agent.is_some()
    }
}
