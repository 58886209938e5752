use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::services::geo_service::DEFAULT_NEARBY_RADIUS_KM;

pub const DEFAULT_NEARBY_FEED_LIMIT: usize = 3;
pub const DEFAULT_GEOCODER_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub host_header: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            host_header: "geocoder.localhost".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub geocoder: GeocoderSettings,
    pub nearby_radius_km: f64,
    pub nearby_feed_limit: usize,
    pub geocoder_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:civic.db?mode=rwc".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            geocoder: GeocoderSettings::default(),
            nearby_radius_km: DEFAULT_NEARBY_RADIUS_KM,
            nearby_feed_limit: DEFAULT_NEARBY_FEED_LIMIT,
            geocoder_concurrency: DEFAULT_GEOCODER_CONCURRENCY,
        }
    }
}

impl AppConfig {
    // Call dotenvy::dotenv() first to pick up .env.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let timeout_secs = parse_or(
            &lookup,
            "GEOCODER_TIMEOUT_SECS",
            defaults.geocoder.timeout.as_secs(),
        );
        let radius = parse_or(&lookup, "NEARBY_RADIUS_KM", defaults.nearby_radius_km);

        Self {
            database_url: text("DATABASE_URL", defaults.database_url),
            host: text("HOST", defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            geocoder: GeocoderSettings {
                base_url: text("GEOCODER_API_URL", defaults.geocoder.base_url),
                host_header: text("GEOCODER_SERVICE_HOST", defaults.geocoder.host_header),
                api_key: lookup("GEOCODER_API_KEY").filter(|v| !v.trim().is_empty()),
                timeout: Duration::from_secs(timeout_secs.max(1)),
            },
            nearby_radius_km: if radius.is_finite() && radius >= 0.0 {
                radius
            } else {
                warn!("⚙️  NEARBY_RADIUS_KM={} ignored, using default", radius);
                defaults.nearby_radius_km
            },
            nearby_feed_limit: parse_or(&lookup, "NEARBY_FEED_LIMIT", defaults.nearby_feed_limit)
                .max(1),
            geocoder_concurrency: parse_or(
                &lookup,
                "GEOCODER_CONCURRENCY",
                defaults.geocoder_concurrency,
            )
            .max(1),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!("⚙️  {}='{}' is not valid, using default", key, raw);
            default
        }
    }
}
