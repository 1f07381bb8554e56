use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::restaurant::Restaurant;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/restaurants", post(create_restaurant).get(list_restaurants))
}

#[derive(Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub location: Option<GeoPoint>,
}

async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let restaurant = Restaurant {
        id: Uuid::new_v4(),
        name: payload.name,
        location: payload.location,
    };

    state.restaurants.insert(restaurant.id, restaurant.clone());
    Ok(Json(restaurant))
}

async fn list_restaurants(State(state): State<Arc<AppState>>) -> Json<Vec<Restaurant>> {
    let mut restaurants: Vec<Restaurant> = state
        .restaurants
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    restaurants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    Json(restaurants)
}
