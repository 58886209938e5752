use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

use civic_reports::config::AppConfig;
use civic_reports::database::{schema, SqliteReportStore};
use civic_reports::services::address_service::{self, LOCATION_NOT_AVAILABLE};
use civic_reports::services::location_service::HttpReverseGeocoder;
use civic_reports::services::ReportStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = AppConfig::from_env();
    let pool = match SqlitePoolOptions::new().connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot connect to {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = schema::apply_schema(&pool).await {
        eprintln!("schema failed: {}", e);
        std::process::exit(1);
    }

    let geocoder = match HttpReverseGeocoder::new(&config.geocoder) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("geocoder client failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = SqliteReportStore::new(pool);
    let reports = match store.list_all_reports().await {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("listing reports failed: {}", e);
            std::process::exit(1);
        }
    };

    let addresses =
        address_service::resolve_addresses(&geocoder, &reports, config.geocoder_concurrency)
            .await;

    let mut fallback = 0;
    for report in &reports {
        let address = addresses
            .get(&report.id)
            .map(String::as_str)
            .unwrap_or(LOCATION_NOT_AVAILABLE);
        if address == LOCATION_NOT_AVAILABLE || address == report.coordinate.to_string() {
            fallback += 1;
        }
        println!("{}\t{}", report.id, address);
    }

    println!(
        "address resolve: total={}, resolved={}, fallback={}",
        reports.len(),
        reports.len() - fallback,
        fallback
    );
}
