//! Spatial utilities: coordinate validation, geodesic distance and
//! R-tree candidate lookup.

mod distance;
mod index;
mod validate;

pub use distance::{bounding_box, great_circle_km, BoundingBox};
pub use index::RecordIndex;
pub use validate::{check_radius, validate_coordinates, validate_radius};
