use async_trait::async_trait;

use crate::error::{GeocodeError, LocationError, StoreError};
use crate::models::{AddressComponents, Coordinate, NewReport, Report, ReportStatus};

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError>;
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_coordinate(&self, high_accuracy: bool) -> Result<Coordinate, LocationError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    // Newest first.
    async fn list_all_reports(&self) -> Result<Vec<Report>, StoreError>;
    // Newest first.
    async fn list_reports_by_owner(&self, owner_id: &str) -> Result<Vec<Report>, StoreError>;
    async fn get_report(&self, report_id: &str) -> Result<Option<Report>, StoreError>;
    async fn create_report(&self, report: NewReport) -> Result<String, StoreError>;
    // Idempotent both ways.
    async fn set_vote(&self, report_id: &str, user_id: &str, add: bool) -> Result<(), StoreError>;
    async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<(), StoreError>;
}
