//! WGS84 point type shared by entities, listings and user profiles.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Geographic point (SRID 4326)
///
/// Construct through [`GeoPoint::new`] to enforce the latitude/longitude
/// bounds. Deserialized points are unchecked until they pass through the
/// store's write path, which re-validates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range or non-finite coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SearchError> {
        let point = Self {
            latitude,
            longitude,
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(SearchError::InvalidCoordinates(format!(
                "Latitude must be between -90 and 90, and longitude between -180 and 180 (got {}, {})",
                latitude, longitude
            )))
        }
    }

    /// NaN fails both range checks, so it is never valid.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Convert to a `geo` point (x = longitude, y = latitude)
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
