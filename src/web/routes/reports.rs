use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::{Coordinate, NewReportRequest, ReportStatus};
use crate::services::report_service;
use crate::web::api_error::ApiError;
use crate::web::state::AppState;

const MAX_NEARBY_LIMIT: usize = 50;

#[derive(Debug, Deserialize, Default)]
pub struct CommunityQuery {
    pub status: Option<i64>,
    pub viewer: Option<String>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<CommunityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status_filter = match query.status {
        Some(v) => Some(ReportStatus::from_ordinal(v).ok_or(ValidationError::InvalidStatus(v))?),
        None => None,
    };
    let viewer = query.viewer.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let feed = report_service::community_feed(state.store.as_ref(), status_filter, viewer).await?;
    Ok(Json(feed))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Json(request): Json<NewReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = report_service::submit_report(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

#[derive(Debug, Deserialize, Default)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

pub async fn nearby_reports(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let origin = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
        _ => return Err(ValidationError::LocationUnavailable.into()),
    };
    if !origin.is_known() {
        return Err(ValidationError::LocationUnavailable.into());
    }

    let radius_km = query
        .radius_km
        .filter(|r| r.is_finite() && *r >= 0.0)
        .unwrap_or(state.config.nearby_radius_km);
    let limit = query
        .limit
        .unwrap_or(state.config.nearby_feed_limit)
        .clamp(1, MAX_NEARBY_LIMIT);

    let feed =
        report_service::nearby_feed(state.store.as_ref(), origin, radius_km, limit).await?;
    Ok(Json(feed))
}

pub async fn map_markers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = state.store.list_all_reports().await?;
    Ok(Json(report_service::map_markers(&reports)))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: String,
    pub add: bool,
}

pub async fn vote(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    report_service::cast_vote(state.store.as_ref(), &report_id, &body.user_id, body.add).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: i64,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    report_service::change_status(state.store.as_ref(), &report_id, body.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn user_reports(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = report_service::profile_summary(
        state.store.as_ref(),
        state.geocoder.as_ref(),
        &user_id,
        state.config.geocoder_concurrency,
    )
    .await?;
    Ok(Json(summary))
}
