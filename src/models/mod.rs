//! Core data models for the local-commerce backend.

pub mod entity;
pub mod listing;
pub mod point;
pub mod record;
pub mod user;

pub use entity::{Entity, EntityMedia, EntityPermission, EntityRole, EntityUser, MediaType, NewEntity};
pub use listing::{
    Availability, Category, Collection, Condition, Listing, ListingDetails, ListingType,
    NewListing, Review,
};
pub use point::GeoPoint;
pub use record::{RecordKind, SearchableRecord};
pub use user::{User, UserPreferences};
