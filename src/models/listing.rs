//! Listings (products, services, events) and their satellites.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoPoint, SearchableRecord};
use crate::error::ValidationError;
use crate::validators;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Product,
    Service,
    Event,
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingType::Product => write!(f, "product"),
            ListingType::Service => write!(f, "service"),
            ListingType::Event => write!(f, "event"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    New,
    Used,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    SoldOut,
}

/// Type-specific details for services and events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingDetails {
    Service {
        service_type: String,
        duration_minutes: u32,
        service_area: String,
        #[serde(default)]
        provider_details: String,
    },
    Event {
        event_date: NaiveDate,
        event_time: NaiveTime,
        event_location: String,
        tickets_available: u32,
        ticket_price_cents: i64,
    },
}

/// Something an entity offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    /// Owning entity
    pub vendor: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
    pub title: String,
    pub description: String,
    /// Price in minor currency units
    pub price_cents: i64,
    pub listing_type: ListingType,
    pub condition: Condition,
    pub availability_status: Availability,
    pub location: GeoPoint,
    pub listing_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub views: u64,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ListingDetails>,
}

/// Write-side payload for creating a listing
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    #[serde(default)]
    pub id: Option<u64>,
    pub vendor: u64,
    #[serde(default)]
    pub category: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub listing_type: ListingType,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub availability_status: Availability,
    pub location: GeoPoint,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub details: Option<ListingDetails>,
}

impl Listing {
    pub fn from_new(id: u64, new: NewListing, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        validators::validate_price(new.price_cents)?;

        Ok(Self {
            id,
            vendor: new.vendor,
            category: new.category,
            title: new.title,
            description: new.description,
            price_cents: new.price_cents,
            listing_type: new.listing_type,
            condition: new.condition,
            availability_status: new.availability_status,
            location: new.location,
            listing_date: now,
            expiry_date: new.expiry_date,
            views: 0,
            is_featured: new.is_featured,
            details: new.details,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }

    /// Searchable view; a listing is active while unexpired and its vendor is active
    pub fn to_searchable(&self, now: DateTime<Utc>, vendor_active: bool) -> SearchableRecord {
        SearchableRecord {
            id: self.id,
            name: self.title.clone(),
            description: self.description.clone(),
            tags: Vec::new(),
            location: Some(self.location),
            is_active: vendor_active && !self.is_expired(now),
        }
    }
}

/// Listing category. Top-level when `parent` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

impl Category {
    pub fn new(id: u64, name: &str, parent: Option<u64>) -> Result<Self, ValidationError> {
        validators::validate_category_name(name)?;
        Ok(Self {
            id,
            name: name.to_string(),
            parent,
        })
    }

    pub fn is_subcategory(&self) -> bool {
        self.parent.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub listing: u64,
    pub user: u64,
    pub rating: u8,
    pub review_text: String,
    pub review_date: DateTime<Utc>,
    #[serde(default)]
    pub is_verified_purchase: bool,
}

impl Review {
    pub fn new(
        listing: u64,
        user: u64,
        rating: u8,
        review_text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validators::validate_rating(rating)?;
        Ok(Self {
            listing,
            user,
            rating,
            review_text: review_text.into(),
            review_date: now,
            is_verified_purchase: false,
        })
    }
}

/// Average rating over a set of reviews, `None` when there are none
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

/// Entity-curated group of listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub entity: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub listings: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(id: u64, entity: u64, name: &str, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        validators::validate_collection_name(name)?;
        Ok(Self {
            id,
            entity,
            name: name.to_string(),
            description: String::new(),
            listings: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Add a listing; adding one that is already present is a no-op.
    /// Returns whether the collection changed.
    pub fn add_listing(&mut self, listing_id: u64, now: DateTime<Utc>) -> bool {
        if self.listings.contains(&listing_id) {
            return false;
        }
        self.listings.push(listing_id);
        self.updated_at = now;
        true
    }
}
