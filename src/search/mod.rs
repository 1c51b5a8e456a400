//! Geo-proximity search over entities and listings.
//!
//! Ranking is a pure function of a record snapshot and [`SearchParams`];
//! fetching the snapshot is the store's job.

mod engine;
mod params;

pub use engine::{search, SearchHit};
pub use params::{SearchParams, DEFAULT_RADIUS_KM};
