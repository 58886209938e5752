use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{ReportStore, ReverseGeocoder};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReportStore>,
        geocoder: Arc<dyn ReverseGeocoder>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            geocoder,
            config: Arc::new(config),
        }
    }
}
