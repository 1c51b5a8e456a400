//! Flattened, searchable view of an entity or listing.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Which collection a searchable record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Entity,
    Listing,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Entity => write!(f, "entity"),
            RecordKind::Listing => write!(f, "listing"),
        }
    }
}

/// The fields the proximity search reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Free-form tags (an entity's `deals_in`)
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Option<GeoPoint>,
    pub is_active: bool,
}

impl SearchableRecord {
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            location: None,
            is_active: true,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
