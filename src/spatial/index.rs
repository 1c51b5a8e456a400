//! Spatial index for fast radius candidate lookups.

use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use super::distance::bounding_box;
use crate::models::GeoPoint;

/// Record location wrapped for R-tree indexing
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    pub id: u64,
    coords: [f64; 2],
}

impl IndexedPoint {
    pub fn new(id: u64, location: &GeoPoint) -> Self {
        Self {
            id,
            coords: [location.longitude, location.latitude],
        }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

/// R-tree over record locations.
///
/// Lookups return a superset of the records within the radius; callers
/// still compute exact distances.
#[derive(Default)]
pub struct RecordIndex {
    tree: RTree<IndexedPoint>,
}

impl RecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u64, location: &GeoPoint) {
        self.tree.insert(IndexedPoint::new(id, location));
    }

    /// Remove the entry for `id` at `location`. Returns whether it was present.
    pub fn remove(&mut self, id: u64, location: &GeoPoint) -> bool {
        self.tree.remove(&IndexedPoint::new(id, location)).is_some()
    }

    /// Ids of every indexed record inside the radius envelope around `center`
    pub fn candidates(&self, center: &GeoPoint, radius_km: f64) -> Vec<u64> {
        let bbox = bounding_box(center, radius_km);
        let envelope = AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat]);

        let ids: Vec<u64> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|p| p.id)
            .collect();

        debug!(
            "Index lookup at {} within {}km: {} of {} candidates",
            center,
            radius_km,
            ids.len(),
            self.tree.size()
        );

        ids
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_empty_index() {
        let index = RecordIndex::new();
        assert!(index.is_empty());
        assert!(index.candidates(&p(0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn test_candidates_within_envelope() {
        let near = p(0.1, 0.1);
        let far = p(5.0, 5.0);
        let mut index = RecordIndex::new();
        index.insert(1, &near);
        index.insert(2, &far);
        assert_eq!(index.len(), 2);
        assert_eq!(index.candidates(&p(0.0, 0.0), 50.0), vec![1]);
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut index = RecordIndex::new();
        let old = p(0.0, 0.0);
        let new = p(10.0, 10.0);
        index.insert(7, &old);
        assert!(index.remove(7, &old));
        assert!(!index.remove(7, &old));
        index.insert(7, &new);
        assert!(index.candidates(&old, 20.0).is_empty());
        assert_eq!(index.candidates(&new, 20.0), vec![7]);
    }
}
