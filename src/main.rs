use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use civic_reports::config::AppConfig;
use civic_reports::database::{schema, SqliteReportStore};
use civic_reports::services::location_service::HttpReverseGeocoder;
use civic_reports::web::{self, state::AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!("🗄️  Connecting to database: {}", config.database_url);

    let pool = match SqlitePoolOptions::new().connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Cannot connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = schema::apply_schema(&pool).await {
        error!("Cannot apply schema: {}", e);
        std::process::exit(1);
    }

    let geocoder = match HttpReverseGeocoder::new(&config.geocoder) {
        Ok(g) => g,
        Err(e) => {
            error!("Cannot build geocoder client: {}", e);
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let state = AppState::new(
        Arc::new(SqliteReportStore::new(pool)),
        Arc::new(geocoder),
        config,
    );
    let app = web::app(state);

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            error!("Cannot parse {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };

    // Port taken (another dev instance running): try the next one up.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = SocketAddr::new(addr.ip(), port.saturating_add(1));
            warn!("⚠️  Could not bind {}: {}. Trying {}", addr, e, fallback);
            match tokio::net::TcpListener::bind(fallback).await {
                Ok(l) => l,
                Err(e) => {
                    error!("Cannot bind fallback {}: {}", fallback, e);
                    std::process::exit(1);
                }
            }
        }
    };

    match listener.local_addr() {
        Ok(bound) => info!("🚀 Civic reports API on http://{}", bound),
        Err(_) => info!("🚀 Civic reports API started"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
