//! Seed file loading.
//!
//! A seed file is JSON of the form `{"entities": [...], "listings": [...]}`
//! using the same payloads as the create endpoints.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::MemoryStore;
use crate::models::{NewEntity, NewListing};

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub entities: Vec<NewEntity>,
    #[serde(default)]
    pub listings: Vec<NewListing>,
}

impl SeedFile {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read seed file")?;
        let seed: SeedFile = serde_json::from_str(&content).context("Failed to parse seed file")?;
        Ok(seed)
    }
}

/// Load a seed file into the store.
///
/// Rows that fail validation are skipped with a warning. Returns the number
/// of (entities, listings) stored.
pub fn load_seed<P: AsRef<Path>>(store: &MemoryStore, path: P) -> Result<(usize, usize)> {
    let path = path.as_ref();
    info!("Loading seed data from {}", path.display());

    let seed = SeedFile::load_from_file(path)?;

    let mut entities = 0;
    for new in seed.entities {
        let name = new.name.clone();
        match store.create_entity(new) {
            Ok(_) => entities += 1,
            Err(e) => warn!("Skipping entity '{}': {}", name, e),
        }
    }

    let mut listings = 0;
    for new in seed.listings {
        let title = new.title.clone();
        match store.create_listing(new) {
            Ok(_) => listings += 1,
            Err(e) => warn!("Skipping listing '{}': {}", title, e),
        }
    }

    info!("Seeded {} entities and {} listings", entities, listings);
    Ok((entities, listings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seed_skips_invalid_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "entities": [
                    {{"id": 1, "name": "Chai Point", "location": {{"latitude": 12.97, "longitude": 77.59}}, "deals_in": ["tea"]}},
                    {{"name": "Nowhere", "location": {{"latitude": 123.0, "longitude": 0.0}}}}
                ],
                "listings": [
                    {{"vendor": 1, "title": "Masala chai", "price_cents": 2000, "listing_type": "product",
                      "location": {{"latitude": 12.97, "longitude": 77.59}}, "expiry_date": "2999-01-01T00:00:00Z"}},
                    {{"vendor": 5, "title": "Orphan", "price_cents": 100, "listing_type": "product",
                      "location": {{"latitude": 0.0, "longitude": 0.0}}, "expiry_date": "2999-01-01T00:00:00Z"}}
                ]
            }}"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let (entities, listings) = load_seed(&store, file.path()).unwrap();
        assert_eq!((entities, listings), (1, 1));
        assert_eq!(store.stats(), (1, 1));
    }

    #[test]
    fn test_missing_seed_file_errors() {
        let store = MemoryStore::new();
        assert!(load_seed(&store, "/nonexistent/seed.json").is_err());
    }
}
