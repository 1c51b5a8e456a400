//! Record storage and the fetch interface the search service reads from.

mod memory;
mod seed;

use anyhow::Result;

use crate::models::{GeoPoint, RecordKind, SearchableRecord};

pub use memory::{EntityPatch, MemoryStore};
pub use seed::{load_seed, SeedFile};

/// Source of searchable records.
///
/// Implementations return only active records, in storage order.
pub trait RecordSource: Send + Sync {
    fn fetch_active_records(&self, kind: RecordKind) -> Result<Vec<SearchableRecord>>;

    /// Records that may lie within `radius_km` of `center`.
    ///
    /// May return extra records but must never omit one inside the radius.
    /// Defaults to every active record.
    fn fetch_candidates(
        &self,
        kind: RecordKind,
        center: Option<(&GeoPoint, f64)>,
    ) -> Result<Vec<SearchableRecord>> {
        let _ = center;
        self.fetch_active_records(kind)
    }
}

/// Fixed record list, mostly for tests
impl RecordSource for Vec<SearchableRecord> {
    fn fetch_active_records(&self, _kind: RecordKind) -> Result<Vec<SearchableRecord>> {
        Ok(self.iter().filter(|r| r.is_active).cloned().collect())
    }
}
