//! In-memory record store with per-kind spatial indexes.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use tracing::{debug, info};

use super::RecordSource;
use crate::error::StoreError;
use crate::models::{
    Category, Collection, Entity, EntityPermission, EntityRole, GeoPoint, Listing, ListingType,
    NewEntity, NewListing, RecordKind, Review, SearchableRecord,
};
use crate::spatial::RecordIndex;
use crate::validators;

/// Partial update for an entity; `None` leaves a field untouched
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub contact_info: Option<String>,
    pub website: Option<String>,
    pub deals_in: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Rows of one kind in insertion order, with id lookup and a location index
struct Table<T> {
    rows: Vec<T>,
    by_id: HashMap<u64, usize>,
    index: RecordIndex,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_id: HashMap::new(),
            index: RecordIndex::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    /// Reserve an id, honouring an explicit one if it is free
    fn claim_id(&mut self, kind: &'static str, requested: Option<u64>) -> Result<u64, StoreError> {
        let id = match requested {
            Some(id) if self.by_id.contains_key(&id) => {
                return Err(StoreError::Duplicate { kind, id })
            }
            Some(id) => id,
            None => self.next_id,
        };
        let next = id
            .checked_add(1)
            .ok_or(StoreError::IdOutOfRange { kind, id })?;
        self.next_id = self.next_id.max(next);
        Ok(id)
    }

    fn push(&mut self, id: u64, row: T, location: Option<&GeoPoint>) {
        if let Some(location) = location {
            self.index.insert(id, location);
        }
        self.by_id.insert(id, self.rows.len());
        self.rows.push(row);
    }

    fn get(&self, id: u64) -> Option<&T> {
        self.by_id.get(&id).map(|&pos| &self.rows[pos])
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.by_id.get(&id).map(|&pos| &mut self.rows[pos])
    }

    /// Rows whose indexed location falls near `center`, in insertion order
    fn near(&self, center: &GeoPoint, radius_km: f64) -> Vec<&T> {
        let mut positions: Vec<usize> = self
            .index
            .candidates(center, radius_km)
            .into_iter()
            .filter_map(|id| self.by_id.get(&id).copied())
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|pos| &self.rows[pos]).collect()
    }
}

#[derive(Default)]
struct Inner {
    entities: Table<Entity>,
    listings: Table<Listing>,
    collections: Vec<Collection>,
    categories: Vec<Category>,
    reviews: Vec<Review>,
}

impl Inner {
    fn vendor_active(&self, vendor: u64) -> bool {
        self.entities.get(vendor).is_some_and(|e| e.is_active)
    }

    fn listing_record(&self, listing: &Listing, now: DateTime<Utc>) -> SearchableRecord {
        listing.to_searchable(now, self.vendor_active(listing.vendor))
    }
}

/// Thread-safe CRUD store backing the search service.
///
/// Every write validates locations before anything is stored.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

fn check_location(location: &GeoPoint) -> Result<(), StoreError> {
    if location.is_valid() {
        Ok(())
    } else {
        Err(StoreError::InvalidLocation(format!(
            "Latitude must be between -90 and 90, and longitude between -180 and 180 (got {})",
            location
        )))
    }
}

fn check_entity_fields(
    location: Option<&GeoPoint>,
    contact_info: &str,
    website: Option<&str>,
) -> Result<(), StoreError> {
    if let Some(location) = location {
        check_location(location)?;
    }
    if !contact_info.is_empty() {
        validators::validate_phone_number(contact_info)?;
    }
    if let Some(website) = website {
        validators::validate_website_url(website)?;
    }
    Ok(())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_entity(&self, new: NewEntity) -> Result<Entity, StoreError> {
        check_entity_fields(new.location.as_ref(), &new.contact_info, new.website.as_deref())?;

        let mut inner = self.write();
        let id = inner.entities.claim_id("Entity", new.id)?;
        let entity = Entity::from_new(id, new, Utc::now());
        inner
            .entities
            .push(id, entity.clone(), entity.location.as_ref());

        info!("Created entity {} '{}'", id, entity.name);
        Ok(entity)
    }

    pub fn update_entity(&self, id: u64, patch: EntityPatch) -> Result<Entity, StoreError> {
        check_entity_fields(
            patch.location.as_ref(),
            patch.contact_info.as_deref().unwrap_or_default(),
            patch.website.as_deref(),
        )?;

        let mut inner = self.write();
        let entities = &mut inner.entities;
        let entity = entities
            .get_mut(id)
            .ok_or(StoreError::NotFound { kind: "Entity", id })?;

        let old_location = entity.location;
        if let Some(name) = patch.name {
            entity.name = name;
        }
        if let Some(description) = patch.description {
            entity.description = description;
        }
        if let Some(address) = patch.address {
            entity.address = address;
        }
        if let Some(contact_info) = patch.contact_info {
            entity.contact_info = contact_info;
        }
        if let Some(website) = patch.website {
            entity.website = Some(website);
        }
        if let Some(deals_in) = patch.deals_in {
            entity.deals_in = deals_in;
        }
        if let Some(is_active) = patch.is_active {
            entity.is_active = is_active;
        }
        if let Some(location) = patch.location {
            entity.location = Some(location);
        }
        entity.updated_at = Utc::now();
        let updated = entity.clone();

        if old_location != updated.location {
            if let Some(old) = old_location {
                entities.index.remove(id, &old);
            }
            if let Some(new) = updated.location {
                entities.index.insert(id, &new);
            }
            debug!("Re-indexed entity {} at {:?}", id, updated.location);
        }

        Ok(updated)
    }

    pub fn get_entity(&self, id: u64) -> Option<Entity> {
        self.read().entities.get(id).cloned()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.read().entities.rows.clone()
    }

    pub fn add_entity_user(
        &self,
        entity_id: u64,
        user_id: u64,
        role: EntityRole,
        permission: Option<EntityPermission>,
    ) -> Result<Entity, StoreError> {
        let mut inner = self.write();
        let entity = inner.entities.get_mut(entity_id).ok_or(StoreError::NotFound {
            kind: "Entity",
            id: entity_id,
        })?;
        entity.add_user(user_id, role, permission, Utc::now());
        Ok(entity.clone())
    }

    pub fn create_listing(&self, new: NewListing) -> Result<Listing, StoreError> {
        check_location(&new.location)?;
        validators::validate_price(new.price_cents)?;

        let mut inner = self.write();
        if inner.entities.get(new.vendor).is_none() {
            return Err(StoreError::NotFound {
                kind: "Entity",
                id: new.vendor,
            });
        }

        let id = inner.listings.claim_id("Listing", new.id)?;
        let listing = Listing::from_new(id, new, Utc::now())?;
        inner
            .listings
            .push(id, listing.clone(), Some(&listing.location));

        info!(
            "Created {} listing {} '{}' for entity {}",
            listing.listing_type, id, listing.title, listing.vendor
        );
        Ok(listing)
    }

    pub fn get_listing(&self, id: u64) -> Option<Listing> {
        self.read().listings.get(id).cloned()
    }

    /// Listings offered by an entity, optionally restricted to one type
    pub fn listings_by_vendor(&self, vendor: u64, listing_type: Option<ListingType>) -> Vec<Listing> {
        self.read()
            .listings
            .rows
            .iter()
            .filter(|l| l.vendor == vendor)
            .filter(|l| listing_type.map_or(true, |t| l.listing_type == t))
            .cloned()
            .collect()
    }

    pub fn create_collection(&self, entity_id: u64, name: &str) -> Result<Collection, StoreError> {
        let mut inner = self.write();
        if inner.entities.get(entity_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "Entity",
                id: entity_id,
            });
        }
        let id = inner.collections.len() as u64 + 1;
        let collection = Collection::new(id, entity_id, name, Utc::now())?;
        inner.collections.push(collection.clone());
        Ok(collection)
    }

    /// Add a listing to a collection. Adding twice is harmless.
    pub fn add_to_collection(&self, collection_id: u64, listing_id: u64) -> Result<Collection, StoreError> {
        let mut inner = self.write();
        if inner.listings.get(listing_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "Listing",
                id: listing_id,
            });
        }
        let collection = inner
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or(StoreError::NotFound {
                kind: "Collection",
                id: collection_id,
            })?;
        collection.add_listing(listing_id, Utc::now());
        Ok(collection.clone())
    }

    pub fn collection_items(&self, collection_id: u64) -> Result<Vec<Listing>, StoreError> {
        let inner = self.read();
        let collection = inner
            .collections
            .iter()
            .find(|c| c.id == collection_id)
            .ok_or(StoreError::NotFound {
                kind: "Collection",
                id: collection_id,
            })?;
        Ok(collection
            .listings
            .iter()
            .filter_map(|id| inner.listings.get(*id).cloned())
            .collect())
    }

    pub fn add_category(&self, name: &str, parent: Option<u64>) -> Result<Category, StoreError> {
        let mut inner = self.write();
        if let Some(parent_id) = parent {
            if !inner.categories.iter().any(|c| c.id == parent_id) {
                return Err(StoreError::NotFound {
                    kind: "Category",
                    id: parent_id,
                });
            }
        }
        let category = Category::new(inner.categories.len() as u64 + 1, name, parent)?;
        inner.categories.push(category.clone());
        Ok(category)
    }

    pub fn top_level_categories(&self) -> Vec<Category> {
        self.read()
            .categories
            .iter()
            .filter(|c| !c.is_subcategory())
            .cloned()
            .collect()
    }

    pub fn subcategories(&self) -> Vec<Category> {
        self.read()
            .categories
            .iter()
            .filter(|c| c.is_subcategory())
            .cloned()
            .collect()
    }

    pub fn add_review(&self, review: Review) -> Result<(), StoreError> {
        let mut inner = self.write();
        if inner.listings.get(review.listing).is_none() {
            return Err(StoreError::NotFound {
                kind: "Listing",
                id: review.listing,
            });
        }
        inner.reviews.push(review);
        Ok(())
    }

    pub fn reviews_for(&self, listing_id: u64) -> Vec<Review> {
        self.read()
            .reviews
            .iter()
            .filter(|r| r.listing == listing_id)
            .cloned()
            .collect()
    }

    /// Number of (entities, listings)
    pub fn stats(&self) -> (usize, usize) {
        let inner = self.read();
        (inner.entities.rows.len(), inner.listings.rows.len())
    }
}

impl RecordSource for MemoryStore {
    fn fetch_active_records(&self, kind: RecordKind) -> Result<Vec<SearchableRecord>> {
        let inner = self.read();
        let records: Vec<SearchableRecord> = match kind {
            RecordKind::Entity => inner
                .entities
                .rows
                .iter()
                .map(Entity::to_searchable)
                .collect(),
            RecordKind::Listing => {
                let now = Utc::now();
                inner
                    .listings
                    .rows
                    .iter()
                    .map(|l| inner.listing_record(l, now))
                    .collect()
            }
        };
        Ok(records.into_iter().filter(|r| r.is_active).collect())
    }

    fn fetch_candidates(
        &self,
        kind: RecordKind,
        center: Option<(&GeoPoint, f64)>,
    ) -> Result<Vec<SearchableRecord>> {
        let Some((center, radius_km)) = center else {
            return self.fetch_active_records(kind);
        };

        let inner = self.read();
        let records: Vec<SearchableRecord> = match kind {
            RecordKind::Entity => inner
                .entities
                .near(center, radius_km)
                .into_iter()
                .map(Entity::to_searchable)
                .collect(),
            RecordKind::Listing => {
                let now = Utc::now();
                inner
                    .listings
                    .near(center, radius_km)
                    .into_iter()
                    .map(|l| inner.listing_record(l, now))
                    .collect()
            }
        };
        Ok(records.into_iter().filter(|r| r.is_active).collect())
    }
}
