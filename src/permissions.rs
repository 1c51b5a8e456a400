//! Role-based permission predicates.
//!
//! Reads (GET/HEAD/OPTIONS) are open to everyone; writes depend on the
//! caller's role on the entity.

use axum::http::Method;

use crate::models::{Entity, EntityRole};

/// What the caller wants to manage under an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedContent {
    Products,
    Collections,
    Posts,
}

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

pub fn is_entity_admin(entity: &Entity, user_id: u64, method: &Method) -> bool {
    is_safe_method(method) || entity.role_of(user_id) == Some(EntityRole::Admin)
}

pub fn is_entity_collaborator(entity: &Entity, user_id: u64, method: &Method) -> bool {
    is_safe_method(method) || entity.role_of(user_id) == Some(EntityRole::Collaborator)
}

pub fn is_admin_or_collaborator(entity: &Entity, user_id: u64, method: &Method) -> bool {
    is_safe_method(method) || entity.role_of(user_id).is_some()
}

/// Products, collections and posts are all managed by any staff member.
/// Unlike the object-level checks this applies to reads as well.
pub fn can_manage_entity_content(entity: &Entity, user_id: u64, _content: ManagedContent) -> bool {
    entity.role_of(user_id).is_some()
}

/// Ownership check for user-owned objects (reviews, preferences); reads are open
pub fn is_owner(owner_id: u64, user_id: u64, method: &Method) -> bool {
    is_safe_method(method) || owner_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntity;
    use chrono::Utc;

    fn entity() -> Entity {
        let now = Utc::now();
        let mut entity = Entity::from_new(
            1,
            NewEntity {
                name: "Bakery".to_string(),
                is_active: true,
                created_by: Some(10),
                ..Default::default()
            },
            now,
        );
        entity.add_user(20, EntityRole::Collaborator, None, now);
        entity
    }

    #[test]
    fn test_reads_always_allowed() {
        let e = entity();
        assert!(is_entity_admin(&e, 99, &Method::GET));
        assert!(is_entity_collaborator(&e, 99, &Method::HEAD));
        assert!(is_owner(1, 2, &Method::OPTIONS));
    }

    #[test]
    fn test_writes_need_role() {
        let e = entity();
        assert!(is_entity_admin(&e, 10, &Method::PUT));
        assert!(!is_entity_admin(&e, 20, &Method::PUT));
        assert!(is_entity_collaborator(&e, 20, &Method::POST));
        assert!(!is_entity_collaborator(&e, 10, &Method::POST));
        assert!(is_admin_or_collaborator(&e, 10, &Method::DELETE));
        assert!(is_admin_or_collaborator(&e, 20, &Method::DELETE));
        assert!(!is_admin_or_collaborator(&e, 99, &Method::DELETE));
    }

    #[test]
    fn test_content_management() {
        let e = entity();
        assert!(can_manage_entity_content(&e, 20, ManagedContent::Products));
        assert!(can_manage_entity_content(&e, 10, ManagedContent::Collections));
        assert!(!can_manage_entity_content(&e, 99, ManagedContent::Posts));
        assert!(!is_owner(1, 2, &Method::PATCH));
    }
}
