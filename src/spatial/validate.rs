//! Coordinate and radius parsing for incoming requests.

use crate::error::SearchError;
use crate::models::GeoPoint;

/// Parse and validate a latitude/longitude pair given as raw strings.
///
/// Surrounding whitespace is ignored. Anything that is not a finite real in
/// range is rejected with [`SearchError::InvalidCoordinates`].
pub fn validate_coordinates(latitude: &str, longitude: &str) -> Result<GeoPoint, SearchError> {
    let parse = |raw: &str| {
        raw.trim().parse::<f64>().map_err(|_| {
            SearchError::InvalidCoordinates(
                "Invalid coordinate format. Please provide valid numbers for latitude and longitude."
                    .to_string(),
            )
        })
    };

    let lat = parse(latitude)?;
    let lon = parse(longitude)?;
    GeoPoint::new(lat, lon)
}

/// Parse a search radius in kilometres. Must be a finite positive number.
pub fn validate_radius(raw: &str) -> Result<f64, SearchError> {
    let radius = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| SearchError::InvalidRadius(format!("'{}' is not a number", raw)))?;
    check_radius(radius)
}

pub fn check_radius(radius_km: f64) -> Result<f64, SearchError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(SearchError::InvalidRadius(format!(
            "Radius must be a positive number of kilometers (got {})",
            radius_km
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pairs_accepted() {
        for (lat, lon) in [("0", "0"), ("-90", "180"), ("90", "-180"), (" 12.5 ", "77.25")] {
            assert!(validate_coordinates(lat, lon).is_ok(), "{} {}", lat, lon);
        }
    }

    #[test]
    fn test_invalid_pairs_rejected() {
        for (lat, lon) in [
            ("91", "0"),
            ("0", "180.01"),
            ("abc", "0"),
            ("", "0"),
            ("NaN", "0"),
            ("0", "inf"),
        ] {
            assert!(
                matches!(
                    validate_coordinates(lat, lon),
                    Err(SearchError::InvalidCoordinates(_))
                ),
                "{} {}",
                lat,
                lon
            );
        }
    }

    #[test]
    fn test_radius() {
        assert_eq!(validate_radius("10"), Ok(10.0));
        assert_eq!(validate_radius("0.5"), Ok(0.5));
        assert!(matches!(validate_radius("0"), Err(SearchError::InvalidRadius(_))));
        assert!(matches!(validate_radius("-5"), Err(SearchError::InvalidRadius(_))));
        assert!(matches!(validate_radius("far"), Err(SearchError::InvalidRadius(_))));
        assert!(check_radius(f64::NAN).is_err());
    }
}
