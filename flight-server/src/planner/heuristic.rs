//! Remaining-distance estimate for the leg search.

use crate::domain::{Airport, Route};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Estimated distance left from `from` to `destination`.
///
/// A known direct route to the destination is used as-is; otherwise the
/// great-circle distance.
pub fn remaining_km(from: &Airport, destination: &Airport, direct: Option<&Route>) -> f64 {
    match direct {
        Some(route) => f64::from(route.distance_km),
        None => haversine_km(
            from.latitude,
            from.longitude,
            destination.latitude,
            destination.longitude,
        ),
    }
}
