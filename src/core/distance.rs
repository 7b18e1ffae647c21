use geo::{HaversineDistance, Point};

use crate::models::BoundingBox;

/// Calculate the great-circle distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // geo points are (x = lon, y = lat) and distances come back in meters
    let a = Point::new(lon1, lat1);
    let b = Point::new(lon2, lat2);
    a.haversine_distance(&b) / 1000.0
}

/// Mean Earth radius in kilometers, matching the one `geo` uses for haversine
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Calculate a bounding box around a center point
///
/// Used as a cheap pre-check before the exact distance, so it must contain
/// the whole great-circle disc. The longitude half-width is
/// `asin(sin(r) / cos(lat))` for angular radius `r`; when the disc reaches a
/// pole every longitude is inside.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees();

    let min_lat = lat - lat_delta;
    let max_lat = lat + lat_delta;

    if max_lat >= 90.0 || min_lat <= -90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lon: lon - 180.0,
            max_lon: lon + 180.0,
        };
    }

    let ratio = (angular.sin() / lat.to_radians().cos()).min(1.0);
    let lon_delta = ratio.asin().to_degrees();

    BoundingBox {
        min_lat,
        max_lat,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Boxes that cross the antimeridian are handled by shifting the point's
/// longitude by a full turn.
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }
    [lon, lon - 360.0, lon + 360.0]
        .iter()
        .any(|l| *l >= bbox.min_lon && *l <= bbox.max_lon)
}
