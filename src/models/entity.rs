//! Entity (business profile) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{GeoPoint, SearchableRecord};

/// Staff role on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityRole {
    Admin,
    Collaborator,
}

/// Optional fine-grained permission on a staff membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityPermission {
    Edit,
    View,
}

/// A user's membership in an entity's staff roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUser {
    pub user_id: u64,
    pub role: EntityRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<EntityPermission>,
    #[serde(default)]
    pub is_creator: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    #[serde(rename = "tour_360")]
    Tour360,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "Image"),
            MediaType::Video => write!(f, "Video"),
            MediaType::Tour360 => write!(f, "360 Tour"),
        }
    }
}

/// Media attached to an entity (stored elsewhere, referenced by URL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMedia {
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Business profile.
///
/// `deals_in` doubles as the searchable tag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub deals_in: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    /// Free-form opening hours, e.g. {"mon": "9-17"}
    #[serde(default)]
    pub business_hours: HashMap<String, String>,
    #[serde(default)]
    pub social_media_links: HashMap<String, String>,
    pub is_active: bool,
    #[serde(default)]
    pub users: Vec<EntityUser>,
    #[serde(default)]
    pub media: Vec<EntityMedia>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Write-side payload for creating an entity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntity {
    /// Explicit id (seed files); assigned by the store when absent
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub deals_in: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub business_hours: HashMap<String, String>,
    #[serde(default)]
    pub social_media_links: HashMap<String, String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// User who created the entity; becomes its first admin
    #[serde(default)]
    pub created_by: Option<u64>,
}

fn default_active() -> bool {
    true
}

impl Entity {
    /// Build an entity from a creation payload
    pub fn from_new(id: u64, new: NewEntity, now: DateTime<Utc>) -> Self {
        let users = new
            .created_by
            .map(|user_id| {
                vec![EntityUser {
                    user_id,
                    role: EntityRole::Admin,
                    permission: None,
                    is_creator: true,
                    created_at: now,
                }]
            })
            .unwrap_or_default();

        Self {
            id,
            name: new.name,
            description: new.description,
            location: new.location,
            address: new.address,
            contact_info: new.contact_info,
            email: new.email,
            website: new.website,
            deals_in: new.deals_in,
            amenities: new.amenities,
            payment_methods: new.payment_methods,
            business_hours: new.business_hours,
            social_media_links: new.social_media_links,
            is_active: new.is_active,
            users,
            media: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add or replace a staff membership. Each user appears at most once.
    pub fn add_user(
        &mut self,
        user_id: u64,
        role: EntityRole,
        permission: Option<EntityPermission>,
        now: DateTime<Utc>,
    ) {
        if let Some(existing) = self.users.iter_mut().find(|u| u.user_id == user_id) {
            existing.role = role;
            existing.permission = permission;
            return;
        }
        self.users.push(EntityUser {
            user_id,
            role,
            permission,
            is_creator: false,
            created_at: now,
        });
    }

    pub fn add_media(&mut self, media_type: MediaType, url: Option<String>, now: DateTime<Utc>) {
        self.media.push(EntityMedia {
            media_type,
            url,
            created_at: now,
        });
    }

    /// Role held by a user, if any
    pub fn role_of(&self, user_id: u64) -> Option<EntityRole> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.role)
    }

    pub fn to_searchable(&self) -> SearchableRecord {
        SearchableRecord {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            tags: self.deals_in.clone(),
            location: self.location,
            is_active: self.is_active,
        }
    }
}
