use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::GeocodeError;
use crate::models::{AddressComponents, Coordinate, Report, ReportStatus};
use crate::services::capabilities::ReverseGeocoder;

pub fn report_at(id: &str, coordinate: Coordinate) -> Report {
    Report {
        id: id.to_string(),
        title: format!("Report {id}"),
        description: String::new(),
        category: "Pothole".to_string(),
        coordinate,
        image_url: None,
        audio_url: None,
        status: ReportStatus::Reported,
        created_at: DateTime::<Utc>::default(),
        owner_id: "owner".to_string(),
        owner_name: "Owner".to_string(),
        votes: Vec::new(),
    }
}

pub fn components(fields: &[(&str, &str)]) -> AddressComponents {
    let mut c = AddressComponents::default();
    for (key, value) in fields {
        let value = Some(value.to_string());
        match *key {
            "street" => c.street = value,
            "street_number" => c.street_number = value,
            "name" => c.name = value,
            "district" => c.district = value,
            "city" => c.city = value,
            "subregion" => c.subregion = value,
            "region" => c.region = value,
            "postal_code" => c.postal_code = value,
            other => panic!("unknown address field {other}"),
        }
    }
    c
}

// Fails the test if a lookup is attempted.
pub struct PanickingGeocoder;

#[async_trait]
impl ReverseGeocoder for PanickingGeocoder {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError> {
        panic!("geocoder must not be called for {coordinate}");
    }
}

pub struct FailingGeocoder;

#[async_trait]
impl ReverseGeocoder for FailingGeocoder {
    async fn reverse_geocode(
        &self,
        _coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError> {
        Err(GeocodeError::Unreachable("connection refused".to_string()))
    }
}

// Same answer for every coordinate; counts lookups.
pub struct CannedGeocoder {
    answer: Option<AddressComponents>,
    calls: AtomicUsize,
}

impl CannedGeocoder {
    pub fn new(answer: AddressComponents) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseGeocoder for CannedGeocoder {
    async fn reverse_geocode(
        &self,
        _coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

// Answers "Pune" after a short delay; records the peak number of concurrent lookups.
#[derive(Default)]
pub struct InFlightGeocoder {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InFlightGeocoder {
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseGeocoder for InFlightGeocoder {
    async fn reverse_geocode(
        &self,
        _coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Some(components(&[("city", "Pune")])))
    }
}
