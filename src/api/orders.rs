use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::dispatch::{assign_agent, suggest_agents};
use crate::engine::lookup::OrderBook;
use crate::engine::ranking::NoSuggestionReason;
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::assignment::Assignment;
use crate::models::order::{Order, OrderItem, OrderStatus};
use crate::models::suggestion::AgentSuggestion;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/suggestions", get(get_suggestions))
        .route("/orders/:id/assign", post(assign_order))
        .route("/assignments", get(list_assignments))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub delivery_location: Option<GeoPoint>,
    pub items: Vec<OrderItem>,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub agent_id: Uuid,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub order_id: Uuid,
    pub suggestions: Vec<AgentSuggestion>,
    pub reason: Option<NoSuggestionReason>,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order needs at least one item".to_string(),
        ));
    }
    if payload.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::BadRequest("item quantity must be > 0".to_string()));
    }

    let order = Order {
        id: Uuid::new_v4(),
        delivery_location: payload.delivery_location,
        items: payload.items,
        status: OrderStatus::Pending,
        assigned_agent: None,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    Ok(Json(order))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Json<Vec<Order>> {
    let mut orders: Vec<Order> = state
        .orders
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|order| query.status.map_or(true, |status| order.status == status))
        .collect();
    orders.sort_by_key(|order| order.created_at);

    Json(orders)
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    state
        .order(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))
}

async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let order = state
        .order(id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    let ranking = suggest_agents(state.as_ref(), &state.metrics, &order);

    Ok(Json(SuggestionsResponse {
        order_id: order.id,
        suggestions: ranking.suggestions,
        reason: ranking.reason,
    }))
}

async fn assign_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = assign_agent(state.as_ref(), &state.metrics, id, payload.agent_id)?;
    Ok(Json(assignment))
}

async fn list_assignments(State(state): State<Arc<AppState>>) -> Json<Vec<Assignment>> {
    let mut assignments: Vec<Assignment> = state
        .assignments
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    assignments.sort_by_key(|assignment| assignment.assigned_at);

    Json(assignments)
}
