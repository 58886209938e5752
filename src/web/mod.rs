pub mod api_error;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::web::routes::{health, location, reports};
use crate::web::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::submit_report),
        )
        .route("/api/reports/nearby", get(reports::nearby_reports))
        .route("/api/reports/map", get(reports::map_markers))
        .route("/api/reports/:report_id/vote", post(reports::vote))
        .route("/api/reports/:report_id/status", post(reports::update_status))
        .route("/api/users/:user_id/reports", get(reports::user_reports))
        .route("/api/location/reverse", get(location::reverse_geocode))
        .route("/api/location/current", get(location::current_location))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
