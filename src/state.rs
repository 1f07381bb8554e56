use dashmap::DashMap;
use uuid::Uuid;

use crate::models::agent::DeliveryAgent;
use crate::models::assignment::Assignment;
use crate::models::order::Order;
use crate::models::restaurant::Restaurant;
use crate::observability::metrics::Metrics;

/// In-process record store shared by every handler. Constructed once in
/// `main` and handed to the router; nothing reaches it through a global.
pub struct AppState {
    pub agents: DashMap<Uuid, DeliveryAgent>,
    pub restaurants: DashMap<Uuid, Restaurant>,
    pub orders: DashMap<Uuid, Order>,
    pub assignments: DashMap<Uuid, Assignment>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
            restaurants: DashMap::new(),
            orders: DashMap::new(),
            assignments: DashMap::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn refresh_agents_online(&self) {
        let online = self
            .agents
            .iter()
            .filter(|entry| entry.value().online)
            .count();
        self.metrics.agents_online.set(online as i64);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
