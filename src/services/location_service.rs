use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GeocoderSettings;
use crate::error::{GeocodeError, LocationError};
use crate::models::{AddressComponents, Coordinate};
use crate::services::address_service;
use crate::services::capabilities::{LocationProvider, ReverseGeocoder};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CurrentLocation {
    pub coordinate: Coordinate,
    pub address: String,
}

// Upstream payloads vary between providers; accept the common spellings.
#[derive(Debug, Deserialize, Default)]
struct AddressHit {
    street: Option<String>,
    road: Option<String>,
    #[serde(rename = "streetNumber")]
    street_number_camel: Option<TextOrNumber>,
    street_number: Option<TextOrNumber>,
    house_number: Option<TextOrNumber>,
    name: Option<String>,
    district: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    subregion: Option<String>,
    county: Option<String>,
    region: Option<String>,
    state: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code_camel: Option<TextOrNumber>,
    postal_code: Option<TextOrNumber>,
    postcode: Option<TextOrNumber>,
}

// House numbers and postcodes arrive as either JSON strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

impl From<AddressHit> for AddressComponents {
    fn from(hit: AddressHit) -> Self {
        AddressComponents {
            street: hit.street.or(hit.road),
            street_number: hit
                .street_number_camel
                .or(hit.street_number)
                .or(hit.house_number)
                .map(TextOrNumber::into_text),
            name: hit.name,
            district: hit.district.or(hit.suburb),
            city: hit.city.or(hit.town).or(hit.village),
            subregion: hit.subregion.or(hit.county),
            region: hit.region.or(hit.state),
            postal_code: hit
                .postal_code_camel
                .or(hit.postal_code)
                .or(hit.postcode)
                .map(TextOrNumber::into_text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    results: Option<Vec<AddressHit>>,
    address: Option<AddressHit>,
}

// `{"results": []}` means no match.
fn parse_reverse_body(body: &str) -> Result<Option<AddressComponents>, GeocodeError> {
    let parsed: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    let best = parsed
        .results
        .and_then(|hits| hits.into_iter().next())
        .or(parsed.address);
    Ok(best.map(AddressComponents::from))
}

#[derive(Debug, Clone)]
pub struct HttpReverseGeocoder {
    client: reqwest::Client,
    settings: GeocoderSettings,
}

impl HttpReverseGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GeocodeError::Client(e.to_string()))?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    fn reverse_url(&self) -> String {
        format!("{}/reverse", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReverseGeocoder for HttpReverseGeocoder {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<AddressComponents>, GeocodeError> {
        let url = self.reverse_url();
        let mut req = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ])
            .header("Host", &self.settings.host_header);

        if let Some(key) = &self.settings.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("📍 Geocoder upstream unreachable: {}", e);
                return Err(GeocodeError::Unreachable(e.to_string()));
            }
        };

        if !resp.status().is_success() {
            warn!("📍 Geocoder upstream non-OK: {}", resp.status());
            return Err(GeocodeError::UpstreamStatus(resp.status().as_u16()));
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("📍 Geocoder upstream body read failed: {}", e);
                return Err(GeocodeError::Decode(e.to_string()));
            }
        };

        parse_reverse_body(&body).inspect_err(|e| {
            warn!("📍 Geocoder upstream JSON parse failed: {}", e);
        })
    }
}

// A server cannot sample a device, so a missing fix reads as a denied permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLocation {
    coordinate: Option<Coordinate>,
}

impl RequestLocation {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            coordinate: latitude.zip(longitude).map(Coordinate::from),
        }
    }
}

#[async_trait]
impl LocationProvider for RequestLocation {
    async fn current_coordinate(&self, high_accuracy: bool) -> Result<Coordinate, LocationError> {
        debug!("📍 Request location (high_accuracy={})", high_accuracy);
        self.coordinate
            .filter(Coordinate::is_valid)
            .ok_or(LocationError::PermissionDenied)
    }
}

pub async fn current_location(
    provider: &dyn LocationProvider,
    geocoder: &dyn ReverseGeocoder,
    high_accuracy: bool,
) -> Option<CurrentLocation> {
    let coordinate = match provider.current_coordinate(high_accuracy).await {
        Ok(c) => c,
        Err(e) => {
            info!("📍 Current location unavailable: {}", e);
            return None;
        }
    };

    let address = address_service::address_for(geocoder, coordinate).await;
    Some(CurrentLocation {
        coordinate,
        address,
    })
}
