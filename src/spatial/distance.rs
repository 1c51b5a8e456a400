//! Geodesic distances and search envelopes.

use geo::{Distance, Geodesic};

use crate::models::GeoPoint;

/// Shortest kilometres per degree of latitude on WGS84 (at the equator)
const KM_PER_DEG_LAT_MIN: f64 = 110.574;

/// Kilometres per degree of longitude at the equator, before the cos(lat) factor
const KM_PER_DEG_LON_EQUATOR: f64 = 111.319;

/// Slack applied to envelope half-widths so rounding never clips a match
const ENVELOPE_MARGIN: f64 = 1.01;

/// Distance between two points along the WGS84 ellipsoid, in kilometres
pub fn great_circle_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Geodesic.distance(a.to_geo(), b.to_geo()) / 1000.0
}

/// Axis-aligned lat/lon envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Envelope containing every point within `radius_km` of `center`.
///
/// The box may be larger than necessary. It widens to the full longitude
/// range when it would reach a pole or cross the antimeridian.
pub fn bounding_box(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEG_LAT_MIN * ENVELOPE_MARGIN;
    let min_lat = (center.latitude - lat_delta).max(-90.0);
    let max_lat = (center.latitude + lat_delta).min(90.0);

    let extreme_lat = min_lat.abs().max(max_lat.abs());
    let full_lon = (-180.0, 180.0);

    let (min_lon, max_lon) = if extreme_lat >= 90.0 {
        full_lon
    } else {
        let km_per_deg_lon = KM_PER_DEG_LON_EQUATOR * extreme_lat.to_radians().cos();
        let lon_delta = radius_km / km_per_deg_lon * ENVELOPE_MARGIN;
        let (lo, hi) = (center.longitude - lon_delta, center.longitude + lon_delta);
        if lo < -180.0 || hi > 180.0 {
            full_lon
        } else {
            (lo, hi)
        }
    };

    BoundingBox {
        min_lon,
        min_lat,
        max_lon,
        max_lat,
    }
}
