//! Search parameter parsing.

use tracing::debug;

use crate::error::SearchError;
use crate::models::GeoPoint;
use crate::spatial::{check_radius, validate_coordinates, validate_radius};

/// Radius used when the caller supplies a center but no radius
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Validated search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Case-insensitive substring; `None` matches everything
    pub text: Option<String>,
    pub center: Option<GeoPoint>,
    /// Only meaningful when `center` is set
    pub radius_km: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            text: None,
            center: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl SearchParams {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn near(center: GeoPoint, radius_km: f64) -> Self {
        Self {
            text: None,
            center: Some(center),
            radius_km,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Build parameters from raw query-string values.
    ///
    /// A center exists only when both `lat` and `lon` are present and
    /// non-empty; one without the other disables the geo filter. The radius
    /// is parsed only when there is a center, so a bogus radius without a
    /// center is ignored.
    pub fn from_params(
        text: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
        radius: Option<&str>,
        default_radius_km: f64,
    ) -> Result<Self, SearchError> {
        let text = text.filter(|t| !t.is_empty()).map(String::from);

        let (lat, lon) = match (lat, lon) {
            (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => (lat, lon),
            _ => {
                return Ok(Self {
                    text,
                    center: None,
                    radius_km: default_radius_km,
                })
            }
        };

        let center = validate_coordinates(lat, lon).inspect_err(|e| {
            debug!("Rejected center ({}, {}): {}", lat, lon, e);
        })?;

        let radius_km = match radius.filter(|r| !r.is_empty()) {
            Some(raw) => validate_radius(raw)?,
            None => check_radius(default_radius_km)?,
        };

        Ok(Self {
            text,
            center: Some(center),
            radius_km,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only() {
        let params = SearchParams::from_params(Some("cafe"), None, None, None, 10.0).unwrap();
        assert_eq!(params.text.as_deref(), Some("cafe"));
        assert!(params.center.is_none());
    }

    #[test]
    fn test_empty_text_matches_all() {
        let params = SearchParams::from_params(Some(""), None, None, None, 10.0).unwrap();
        assert!(params.text.is_none());
    }

    #[test]
    fn test_center_with_default_radius() {
        let params = SearchParams::from_params(None, Some("1"), Some("2"), None, 10.0).unwrap();
        assert_eq!(params.center, Some(GeoPoint::new(1.0, 2.0).unwrap()));
        assert_eq!(params.radius_km, 10.0);
    }

    #[test]
    fn test_half_a_center_is_ignored() {
        let params = SearchParams::from_params(None, Some("1"), None, Some("-3"), 10.0).unwrap();
        assert!(params.center.is_none());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = SearchParams::from_params(None, Some("1"), Some("1"), Some("-5"), 10.0).unwrap_err();
        assert!(matches!(err, SearchError::InvalidRadius(_)));
    }

    #[test]
    fn test_bad_center_rejected_before_radius() {
        let err = SearchParams::from_params(None, Some("95"), Some("1"), Some("-5"), 10.0).unwrap_err();
        assert!(matches!(err, SearchError::InvalidCoordinates(_)));
    }
}
