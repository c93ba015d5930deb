//! Great-circle geometry over the product catalog's origin coordinates.

use crate::models::GeoPoint;

/// Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Symmetric, and zero when both points coincide. Inputs are decimal
/// degrees; out-of-range coordinates are the caller's problem and simply
/// produce a mathematically defined result.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Index of the point closest to `target`, or `None` for an empty slice.
/// The earliest point wins on exact ties.
///
/// Used to pick the dispatch depot serving a consumer.
pub fn nearest(target: GeoPoint, points: &[GeoPoint]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, point) in points.iter().enumerate() {
        let distance = haversine_km(target, *point);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}
