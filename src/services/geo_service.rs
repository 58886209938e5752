use crate::models::{Coordinate, Report};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

// Strict `<`. Reports without a usable coordinate never match.
pub fn nearby(reports: Vec<Report>, origin: Coordinate, radius_km: f64) -> Vec<Report> {
    reports
        .into_iter()
        .filter(|report| within_radius(report.coordinate, origin, radius_km))
        .collect()
}

pub fn within_radius(point: Coordinate, origin: Coordinate, radius_km: f64) -> bool {
    point.is_known() && distance_km(origin, point) < radius_km
}

pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        return format!("{}m away", (km * 1000.0).round() as i64);
    }
    format!("{:.1}km away", km)
}
