use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::models::{AddressComponents, Coordinate, Report};
use crate::services::capabilities::ReverseGeocoder;

pub const LOCATION_NOT_AVAILABLE: &str = "Location not available";

// Never fails. (0,0) gives the sentinel; empty or failed lookups give the coordinates.
pub async fn address_for(geocoder: &dyn ReverseGeocoder, coordinate: Coordinate) -> String {
    if coordinate.is_unset() {
        return LOCATION_NOT_AVAILABLE.to_string();
    }

    match geocoder.reverse_geocode(coordinate).await {
        Ok(Some(components)) => {
            compose_address(&components).unwrap_or_else(|| coordinate.to_string())
        }
        Ok(None) => {
            debug!("📍 No reverse geocode match for {}", coordinate);
            coordinate.to_string()
        }
        Err(e) => {
            warn!("📍 Reverse geocode failed for {}: {}", coordinate, e);
            coordinate.to_string()
        }
    }
}

pub fn compose_address(components: &AddressComponents) -> Option<String> {
    let city = present(&components.city);
    let subregion = present(&components.subregion);
    let mut parts: Vec<String> = Vec::new();

    if let Some(street) = present(&components.street) {
        let street_part = match present(&components.street_number) {
            Some(number) => format!("{} {}", number, street),
            None => street.to_string(),
        };
        push_unique(&mut parts, street_part);
    } else if let Some(name) = present(&components.name) {
        if Some(name) != city && Some(name) != subregion {
            push_unique(&mut parts, name.to_string());
        }
    }

    if let Some(district) = present(&components.district).filter(|d| Some(*d) != city) {
        push_unique(&mut parts, district.to_string());
    }

    if let Some(subregion) = subregion.filter(|s| Some(*s) != city) {
        push_unique(&mut parts, subregion.to_string());
    }

    if let Some(city) = city {
        push_unique(&mut parts, city.to_string());
    } else if let Some(region) = present(&components.region) {
        push_unique(&mut parts, region.to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

// At most `concurrency` lookups are in flight at once.
pub async fn resolve_addresses(
    geocoder: &dyn ReverseGeocoder,
    reports: &[Report],
    concurrency: usize,
) -> HashMap<String, String> {
    let lookups: Vec<(String, Coordinate)> = reports
        .iter()
        .map(|report| (report.id.clone(), report.coordinate))
        .collect();
    stream::iter(lookups)
        .map(|(id, coordinate)| async move {
            let address = address_for(geocoder, coordinate).await;
            (id, address)
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<HashMap<_, _>>()
        .await
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn push_unique(parts: &mut Vec<String>, segment: String) {
    if !parts.contains(&segment) {
        parts.push(segment);
    }
}
