//! In-app notifications and follower fan-out.
//!
//! Only builds notification records; delivery (email/push) lives elsewhere.

use chrono::{DateTime, Utc};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Follow,
    FriendRequest,
    Message,
    Comment,
    Review,
    Like,
    NearbyEntity,
    EntityUpdate,
    ProductUpdate,
    ServiceUpdate,
}

impl NotificationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            NotificationType::Follow => "New Follower",
            NotificationType::FriendRequest => "Friend Request",
            NotificationType::Message => "New Message",
            NotificationType::Comment => "New Comment",
            NotificationType::Review => "New Review",
            NotificationType::Like => "New Like",
            NotificationType::NearbyEntity => "Nearby Entity",
            NotificationType::EntityUpdate => "Entity Update",
            NotificationType::ProductUpdate => "Product Update",
            NotificationType::ServiceUpdate => "Service Update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<u64>,
    pub notification_type: NotificationType,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_object_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_object_type: Option<String>,
}

impl Notification {
    pub fn new(
        recipient: u64,
        notification_type: NotificationType,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            recipient,
            sender: None,
            notification_type,
            content: content.into(),
            is_read: false,
            created_at: now,
            related_object_id: None,
            related_object_type: None,
        }
    }

    pub fn mark_as_read(&mut self) {
        self.is_read = true;
    }
}

/// What changed on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Product,
    Service,
    Post,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateKind::Product => write!(f, "product"),
            UpdateKind::Service => write!(f, "service"),
            UpdateKind::Post => write!(f, "post"),
        }
    }
}

/// One `entity_update` notification per follower of `entity`.
///
/// Duplicate follower ids collapse to a single notification; order follows
/// the first occurrence in `followers`.
pub fn entity_update_notifications(
    entity: &Entity,
    update: UpdateKind,
    followers: &[u64],
    sender: Option<u64>,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut seen = HashSet::with_capacity(followers.len());
    let content = format!("{} has a new {}.", entity.name, update);

    let notifications: Vec<Notification> = followers
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|&recipient| Notification {
            sender,
            related_object_id: Some(entity.id),
            related_object_type: Some("entity".to_string()),
            ..Notification::new(recipient, NotificationType::EntityUpdate, content.clone(), now)
        })
        .collect();

    debug!(
        "Fan-out of {} update for entity {}: {} notifications",
        update,
        entity.id,
        notifications.len()
    );

    notifications
}

/// Newest first, matching how inboxes are listed
pub fn sort_inbox(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntity;
    use chrono::Duration;

    #[test]
    fn test_one_notification_per_follower() {
        let now = Utc::now();
        let entity = Entity::from_new(
            5,
            NewEntity {
                name: "Spice Market".to_string(),
                is_active: true,
                ..Default::default()
            },
            now,
        );

        let notes = entity_update_notifications(&entity, UpdateKind::Product, &[3, 1, 3, 2], Some(9), now);
        let recipients: Vec<u64> = notes.iter().map(|n| n.recipient).collect();
        assert_eq!(recipients, vec![3, 1, 2]);
        assert!(notes.iter().all(|n| n.notification_type == NotificationType::EntityUpdate));
        assert!(notes.iter().all(|n| n.related_object_id == Some(5) && !n.is_read));
        assert_eq!(notes[0].content, "Spice Market has a new product.");

        let notes = entity_update_notifications(&entity, UpdateKind::Service, &[4], None, now);
        assert_eq!(notes[0].content, "Spice Market has a new service.");
    }

    #[test]
    fn test_no_followers() {
        let entity = Entity::from_new(1, NewEntity::default(), Utc::now());
        assert!(entity_update_notifications(&entity, UpdateKind::Post, &[], None, Utc::now()).is_empty());
    }

    #[test]
    fn test_inbox_newest_first() {
        let now = Utc::now();
        let mut inbox = vec![
            Notification::new(1, NotificationType::Like, "old", now - Duration::hours(1)),
            Notification::new(1, NotificationType::Follow, "new", now),
        ];
        sort_inbox(&mut inbox);
        assert_eq!(inbox[0].content, "new");
        inbox[0].mark_as_read();
        assert!(inbox[0].is_read);
        assert_eq!(NotificationType::Follow.display_name(), "New Follower");
    }
}
