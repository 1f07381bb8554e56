use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::lookup::{AgentDirectory, DispatchSink, OrderBook, PickupLookup};
use crate::engine::ranking::{rank_agents_explained, Ranking};
use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::order::Order;
use crate::observability::metrics::Metrics;

/// Resolve the pickup leg and rank the current agents for `order`.
pub fn suggest_agents<S>(store: &S, metrics: &Metrics, order: &Order) -> Ranking
where
    S: PickupLookup + AgentDirectory,
{
    let start = Instant::now();
    let (ranking, candidates) = rank_for_order(store, order);

    let outcome = ranking.reason.map_or("ranked", |reason| reason.as_label());
    metrics
        .ranking_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    metrics
        .suggestion_requests_total
        .with_label_values(&[outcome])
        .inc();

    match ranking.reason {
        None => info!(
            order_id = %order.id,
            candidates,
            suggestions = ranking.suggestions.len(),
            "agents ranked"
        ),
        Some(reason) => info!(
            order_id = %order.id,
            candidates,
            reason = reason.as_label(),
            "no agents to suggest"
        ),
    }

    ranking
}

fn rank_for_order<S>(store: &S, order: &Order) -> (Ranking, usize)
where
    S: PickupLookup + AgentDirectory,
{
    let pickup = match store.pickup_for(order) {
        Ok(pickup) => pickup,
        Err(err) => {
            warn!(order_id = %order.id, error = %err, "pickup lookup failed");
            None
        }
    };
    let agents = store.agents();
    let ranking = rank_agents_explained(order, pickup.as_ref(), &agents);

    (ranking, agents.len())
}

/// Record the dispatcher's pick. The stored tier is the one the agent holds
/// in a fresh ranking, if it still makes the shortlist.
pub fn assign_agent<S>(
    store: &S,
    metrics: &Metrics,
    order_id: Uuid,
    agent_id: Uuid,
) -> Result<Assignment, AppError>
where
    S: PickupLookup + AgentDirectory + OrderBook + DispatchSink,
{
    let result = record(store, order_id, agent_id);

    match &result {
        Ok(assignment) => {
            metrics
                .assignments_total
                .with_label_values(&["success"])
                .inc();
            info!(
                order_id = %order_id,
                agent_id = %agent_id,
                tier = ?assignment.tier,
                "order assigned"
            );
        }
        Err(err) => {
            metrics.assignments_total.with_label_values(&["error"]).inc();
            warn!(order_id = %order_id, agent_id = %agent_id, error = %err, "assignment rejected");
        }
    }

    result
}

fn record<S>(
    store: &S,
    order_id: Uuid,
    agent_id: Uuid,
) -> Result<Assignment, AppError>
where
    S: PickupLookup + AgentDirectory + OrderBook + DispatchSink,
{
    let order = store
        .order(order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

    let (ranking, _) = rank_for_order(store, &order);
    let tier = ranking
        .suggestions
        .iter()
        .find(|suggestion| suggestion.agent.id == agent_id)
        .map(|suggestion| suggestion.tier);

    store.record_assignment(order_id, agent_id, tier)
}
