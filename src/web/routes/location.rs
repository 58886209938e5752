use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::Coordinate;
use crate::services::address_service;
use crate::services::location_service::{self, RequestLocation};
use crate::web::api_error::ApiError;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    lat: Option<f64>,
    lng: Option<f64>,
}

pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some((lat, lng)) = query.lat.zip(query.lng) else {
        return Err(ValidationError::LocationUnavailable.into());
    };
    let coordinate = Coordinate::new(lat, lng);
    let address = address_service::address_for(state.geocoder.as_ref(), coordinate).await;
    Ok(Json(serde_json::json!({ "address": address })))
}

#[derive(Debug, Deserialize)]
pub struct CurrentLocationQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    high_accuracy: Option<bool>,
}

pub async fn current_location(
    State(state): State<AppState>,
    Query(query): Query<CurrentLocationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = RequestLocation::new(query.lat, query.lng);
    let high_accuracy = query.high_accuracy.unwrap_or(false);
    let location =
        location_service::current_location(&provider, state.geocoder.as_ref(), high_accuracy).await;
    match location {
        Some(location) => Ok(Json(location)),
        None => Err(ApiError::Forbidden("location permission denied".to_string())),
    }
}
