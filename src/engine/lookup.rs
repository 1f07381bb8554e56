use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::models::assignment::Assignment;
use crate::models::order::{Order, OrderStatus};
use crate::models::restaurant::PickupSite;
use crate::models::suggestion::SuggestionTier;
use crate::state::AppState;

/// Resolves the restaurant an order is picked up from.
///
/// `Ok(None)` means the order has no usable pickup coordinate; `Err` is a
/// failed lookup. Rankers treat both the same way.
pub trait PickupLookup {
    fn pickup_for(&self, order: &Order) -> Result<Option<PickupSite>, AppError>;
}

pub trait AgentDirectory {
    /// Every known agent, ordered by id so rankings do not depend on
    /// storage iteration order.
    fn agents(&self) -> Vec<DeliveryAgent>;
    fn agent(&self, id: Uuid) -> Option<DeliveryAgent>;
}

pub trait OrderBook {
    fn order(&self, id: Uuid) -> Option<Order>;
}

/// Records a dispatcher's decision.
pub trait DispatchSink {
    fn record_assignment(
        &self,
        order_id: Uuid,
        agent_id: Uuid,
        tier: Option<SuggestionTier>,
    ) -> Result<Assignment, AppError>;
}

impl PickupLookup for AppState {
    fn pickup_for(&self, order: &Order) -> Result<Option<PickupSite>, AppError> {
        let Some(restaurant_id) = order.pickup_restaurant_id() else {
            return Ok(None);
        };

        let restaurant = self
            .restaurants
            .get(&restaurant_id)
            .ok_or_else(|| AppError::NotFound(format!("restaurant {restaurant_id} not found")))?;

        Ok(restaurant.pickup_site())
    }
}

impl AgentDirectory for AppState {
    fn agents(&self) -> Vec<DeliveryAgent> {
        let mut agents: Vec<DeliveryAgent> = self
            .agents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        agents.sort_by_key(|agent| agent.id);
        agents
    }

    fn agent(&self, id: Uuid) -> Option<DeliveryAgent> {
        self.agents.get(&id).map(|entry| entry.value().clone())
    }
}

impl OrderBook for AppState {
    fn order(&self, id: Uuid) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }
}

impl DispatchSink for AppState {
    fn record_assignment(
        &self,
        order_id: Uuid,
        agent_id: Uuid,
        tier: Option<SuggestionTier>,
    ) -> Result<Assignment, AppError> {
        if !self.agents.contains_key(&agent_id) {
            return Err(AppError::NotFound(format!("agent {agent_id} not found")));
        }

        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        if order.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "order {order_id} is already {:?}",
                order.status
            )));
        }
        if order.is_assigned() {
            return Err(AppError::Conflict(format!(
                "order {order_id} is already assigned"
            )));
        }

        order.status = OrderStatus::Assigned;
        order.assigned_agent = Some(agent_id);
        drop(order);

        let assignment = Assignment {
            id: Uuid::new_v4(),
            order_id,
            agent_id,
            tier,
            assigned_at: Utc::now(),
        };
        self.assignments.insert(assignment.id, assignment.clone());

        Ok(assignment)
    }
}
