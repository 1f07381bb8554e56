use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::lookup::AgentDirectory;
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::agent::{AgentStatus, DeliveryAgent, VehicleType};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agents", post(create_agent).get(list_agents))
        .route("/agents/:id", get(get_agent))
        .route("/agents/:id/status", patch(update_agent_status))
        .route("/agents/:id/location", patch(update_agent_location))
}

#[derive(Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub online: bool,
    pub status: Option<AgentStatus>,
    pub vehicle_type: Option<VehicleType>,
    pub rating: Option<f64>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct ListAgentsQuery {
    pub online: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AgentStatus,
    pub online: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: Option<GeoPoint>,
}

async fn create_agent(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAgentRequest>,
) -> Result<Json<DeliveryAgent>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let agent = DeliveryAgent {
        id: Uuid::new_v4(),
        name: payload.name,
        location: payload.location,
        online: payload.online,
        status: payload.status.unwrap_or(AgentStatus::Offline),
        vehicle_type: payload.vehicle_type,
        rating: payload
            .rating
            .filter(|rating| rating.is_finite())
            .map(|rating| rating.clamp(0.0, 5.0)),
        phone: payload.phone.filter(|phone| !phone.trim().is_empty()),
        updated_at: Utc::now(),
    };

    state.agents.insert(agent.id, agent.clone());
    state.refresh_agents_online();

    Ok(Json(agent))
}

async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAgentsQuery>,
) -> Json<Vec<DeliveryAgent>> {
    let agents = state
        .agents()
        .into_iter()
        .filter(|agent| query.online.map_or(true, |online| agent.online == online))
        .collect();
    Json(agents)
}

async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryAgent>, AppError> {
    state
        .agent(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("agent {id} not found")))
}

async fn update_agent_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<DeliveryAgent>, AppError> {
    let updated = {
        let mut agent = state
            .agents
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("agent {id} not found")))?;

        agent.status = payload.status;
        if let Some(online) = payload.online {
            agent.online = online;
        }
        agent.updated_at = Utc::now();
        agent.clone()
    };

    state.refresh_agents_online();
    Ok(Json(updated))
}

async fn update_agent_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<DeliveryAgent>, AppError> {
    let mut agent = state
        .agents
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("agent {id} not found")))?;

    agent.location = payload.location;
    agent.updated_at = Utc::now();

    Ok(Json(agent.clone()))
}
