use crate::models::{BoundingBox, Coordinates};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude, rounded down so boxes err on the large side
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers, or `f64::INFINITY` if any coordinate is not a
/// finite number. Infinity means "incomparable" and falls into every
/// distance scorer's lowest tier.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !(lat1.is_finite() && lon1.is_finite() && lat2.is_finite() && lon2.is_finite()) {
        return f64::INFINITY;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinate pairs
#[inline]
pub fn distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Calculate a bounding box around a center point
///
/// Used as a cheap pre-filter before the eligibility gate. The box must be a
/// superset of the true radius, so the longitude span is computed at the
/// box's poleward edge rather than at the center.
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lon` - Center longitude in degrees
/// * `radius_km` - Radius in kilometers
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;

    let edge_lat = (lat.abs() + lat_delta).min(90.0);
    let cos_edge = edge_lat.to_radians().cos();
    let lon_delta = if cos_edge <= f64::EPSILON {
        180.0
    } else {
        (radius_km / (KM_PER_DEGREE * cos_edge)).min(180.0)
    };

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Boxes that cross the antimeridian wrap around.
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    if bbox.max_lon - bbox.min_lon >= 360.0 {
        true
    } else if bbox.min_lon < -180.0 {
        lon >= bbox.min_lon + 360.0 || lon <= bbox.max_lon
    } else if bbox.max_lon > 180.0 {
        lon >= bbox.min_lon || lon <= bbox.max_lon - 360.0
    } else {
        lon >= bbox.min_lon && lon <= bbox.max_lon
    }
}
