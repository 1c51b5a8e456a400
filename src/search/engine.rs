//! Proximity search: text filter, radius filter and distance ranking.

use tracing::debug;

use super::SearchParams;
use crate::error::SearchError;
use crate::models::{GeoPoint, SearchableRecord};
use crate::spatial::{check_radius, great_circle_km};

/// A matching record with its distance from the search center
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: SearchableRecord,
    /// Kilometres from the center; `None` when no center was given
    pub distance_km: Option<f64>,
}

/// Case-insensitive substring match against name, description or any tag
fn matches_text(record: &SearchableRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Run a search over a snapshot of records.
///
/// Inactive records never match. With a center, records without a location
/// or farther than `radius_km` are dropped, and the rest are sorted by
/// distance then id. Without a center the input order is kept.
pub fn search(
    records: Vec<SearchableRecord>,
    params: &SearchParams,
) -> Result<Vec<SearchHit>, SearchError> {
    if let Some(center) = &params.center {
        // Parameters may be built by hand, so check again here.
        GeoPoint::new(center.latitude, center.longitude)?;
        check_radius(params.radius_km)?;
    }

    let needle = params
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let candidates = records.len();

    let matched = records
        .into_iter()
        .filter(|r| r.is_active)
        .filter(|r| needle.as_deref().map_or(true, |n| matches_text(r, n)));

    let hits = match &params.center {
        None => matched
            .map(|record| SearchHit {
                record,
                distance_km: None,
            })
            .collect(),
        Some(center) => {
            let mut hits: Vec<SearchHit> = matched
                .filter_map(|record| {
                    let distance = great_circle_km(center, record.location.as_ref()?);
                    (distance <= params.radius_km).then_some(SearchHit {
                        record,
                        distance_km: Some(distance),
                    })
                })
                .collect();

            hits.sort_by(|a, b| {
                let da = a.distance_km.unwrap_or(f64::INFINITY);
                let db = b.distance_km.unwrap_or(f64::INFINITY);
                da.total_cmp(&db)
                    .then_with(|| a.record.id.cmp(&b.record.id))
            });
            hits
        }
    };

    debug!(
        "Search text={:?} center={:?} radius={}km: {} of {} records matched",
        params.text,
        params.center,
        params.radius_km,
        hits.len(),
        candidates
    );

    Ok(hits)
}
