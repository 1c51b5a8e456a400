//! Padosi - local-commerce backend with geo-proximity search
//!
//! This library provides the models, search engine, record store and HTTP
//! API used by the query binary.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod search;
pub mod server;
pub mod spatial;
pub mod store;
pub mod validators;

pub use error::{SearchError, StoreError, ValidationError};
pub use models::{Entity, GeoPoint, Listing, RecordKind, SearchableRecord};
pub use search::{search, SearchHit, SearchParams};
