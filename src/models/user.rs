//! User accounts and the social graph.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub notification_email: bool,
    pub notification_push: bool,
    pub language: String,
    pub theme: String,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    /// Default radius for proximity searches, in kilometers
    pub search_radius: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notification_email: true,
            notification_push: true,
            language: "en".to_string(),
            theme: "light".to_string(),
            preferred_categories: Vec::new(),
            search_radius: 10,
        }
    }
}

/// A user account with its outgoing social edges.
///
/// Friendship is symmetric, so [`add_friend`] and [`remove_friend`] take
/// both users. Follow, close-friend and block edges are one-directional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_entity: bool,
    #[serde(default)]
    pub friends: HashSet<u64>,
    #[serde(default)]
    pub following: HashSet<u64>,
    #[serde(default)]
    pub followers: HashSet<u64>,
    #[serde(default)]
    pub close_friends: HashSet<u64>,
    #[serde(default)]
    pub favorite_entities: HashSet<u64>,
    #[serde(default)]
    pub blocked_users: HashSet<u64>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn set_location(&mut self, location: GeoPoint) {
        self.location = Some(location);
    }

    pub fn has_blocked(&self, other: u64) -> bool {
        self.blocked_users.contains(&other)
    }

    pub fn add_close_friend(&mut self, other: u64) {
        self.close_friends.insert(other);
    }

    pub fn remove_close_friend(&mut self, other: u64) {
        self.close_friends.remove(&other);
    }

    pub fn favorite_entity(&mut self, entity_id: u64) {
        self.favorite_entities.insert(entity_id);
    }

    pub fn unblock(&mut self, other: u64) {
        self.blocked_users.remove(&other);
    }
}

/// `follower` starts following `target`. Returns false if already following
/// or if either side has blocked the other.
pub fn follow(follower: &mut User, target: &mut User) -> bool {
    if follower.id == target.id || follower.has_blocked(target.id) || target.has_blocked(follower.id) {
        return false;
    }
    let added = follower.following.insert(target.id);
    target.followers.insert(follower.id);
    added
}

pub fn unfollow(follower: &mut User, target: &mut User) {
    follower.following.remove(&target.id);
    target.followers.remove(&follower.id);
}

/// Make `a` and `b` friends in both directions.
pub fn add_friend(a: &mut User, b: &mut User) -> bool {
    if a.id == b.id || a.has_blocked(b.id) || b.has_blocked(a.id) {
        return false;
    }
    let added = a.friends.insert(b.id);
    b.friends.insert(a.id);
    added
}

pub fn remove_friend(a: &mut User, b: &mut User) {
    a.friends.remove(&b.id);
    b.friends.remove(&a.id);
}

/// `blocker` blocks `blocked`: drops friendship and follow edges both ways.
pub fn block(blocker: &mut User, blocked: &mut User) {
    if blocker.id == blocked.id {
        return;
    }
    blocker.blocked_users.insert(blocked.id);
    remove_friend(blocker, blocked);
    unfollow(blocker, blocked);
    unfollow(blocked, blocker);
}
