pub mod agents;
pub mod orders;
pub mod restaurants;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(agents::router())
        .merge(restaurants::router())
        .merge(orders::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

pub fn cors_layer(allow_origin: Option<&str>) -> Result<CorsLayer, AppError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match allow_origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let origin = HeaderValue::from_str(origin).map_err(|err| {
                AppError::Internal(format!("invalid CORS_ALLOW_ORIGIN: {err}"))
            })?;
            Ok(layer.allow_origin(origin))
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    agents: usize,
    restaurants: usize,
    orders: usize,
    assignments: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        agents: state.agents.len(),
        restaurants: state.restaurants.len(),
        orders: state.orders.len(),
        assignments: state.assignments.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
