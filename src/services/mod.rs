pub mod address_service;
pub mod capabilities;
pub mod geo_service;
pub mod location_service;
pub mod report_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use capabilities::{LocationProvider, ReportStore, ReverseGeocoder};
