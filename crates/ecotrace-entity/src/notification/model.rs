//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserRole;

use super::kind::{NotificationCategory, NotificationKind, NotificationPriority};

/// A notification directed at a user or at a whole role.
///
/// Exactly one of `user_id` / `target_role` is the addressing key: when
/// `user_id` is null the notification is role-wide. This is the canonical
/// schema; `is_read` is the one and only read flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Visual kind.
    pub kind: NotificationKind,
    /// Workflow category.
    pub category: NotificationCategory,
    /// Delivery priority.
    pub priority: NotificationPriority,
    /// Recipient user; null for role-wide notifications.
    pub user_id: Option<Uuid>,
    /// Target role for role-wide notifications.
    pub target_role: Option<UserRole>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Link to the action the recipient should take.
    pub action_url: Option<String>,
    /// Linked resource type (`request`, `collection`, `waste_item`).
    pub resource_type: Option<String>,
    /// Linked resource ID.
    pub resource_id: Option<Uuid>,
    /// True only for fallback-generated sample notifications.
    pub synthetic: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the notification expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Visual kind.
    pub kind: NotificationKind,
    /// Workflow category.
    pub category: NotificationCategory,
    /// Delivery priority.
    pub priority: NotificationPriority,
    /// Recipient user; null for role-wide notifications.
    pub user_id: Option<Uuid>,
    /// Target role for role-wide notifications.
    pub target_role: Option<UserRole>,
    /// Action link.
    pub action_url: Option<String>,
    /// Linked resource type.
    pub resource_type: Option<String>,
    /// Linked resource ID.
    pub resource_id: Option<Uuid>,
    /// Expiry time; null means no expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateNotification {
    /// Notification addressed to a single user.
    pub fn for_user(user_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Info,
            category: NotificationCategory::System,
            priority: NotificationPriority::Normal,
            user_id: Some(user_id),
            target_role: None,
            action_url: None,
            resource_type: None,
            resource_id: None,
            expires_at: None,
        }
    }

    /// Role-wide notification.
    pub fn for_role(role: UserRole, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Info,
            category: NotificationCategory::System,
            priority: NotificationPriority::Normal,
            user_id: None,
            target_role: Some(role),
            action_url: None,
            resource_type: None,
            resource_id: None,
            expires_at: None,
        }
    }

    /// Set the visual kind.
    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the workflow category.
    pub fn category(mut self, category: NotificationCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the delivery priority.
    pub fn priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the action link.
    pub fn action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Link a resource.
    pub fn resource(mut self, resource_type: impl Into<String>, resource_id: Uuid) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id);
        self
    }

    /// Set the expiry time.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_addressing() {
        let user_id = Uuid::new_v4();
        let n = CreateNotification::for_user(user_id, "t", "m");
        assert_eq!(n.user_id, Some(user_id));
        assert!(n.target_role.is_none());

        let n = CreateNotification::for_role(UserRole::Technicien, "t", "m");
        assert!(n.user_id.is_none());
        assert_eq!(n.target_role, Some(UserRole::Technicien));
    }

    #[test]
    fn test_expiry_check() {
        let n = Notification {
            id: Uuid::new_v4(),
            title: "t".into(),
            message: "m".into(),
            kind: NotificationKind::Info,
            category: NotificationCategory::System,
            priority: NotificationPriority::Normal,
            user_id: None,
            target_role: Some(UserRole::Administrateur),
            is_read: false,
            read_at: None,
            action_url: None,
            resource_type: None,
            resource_id: None,
            synthetic: false,
            created_at: Utc::now(),
            expires_at: Some(Utc::now() - chrono::Duration::hours(1)),
        };
        assert!(n.is_expired());
        assert!(n.is_unread());
    }
}
