//! Notification CRUD for the authenticated recipient.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use ecotrace_core::config::NotifyConfig;
use ecotrace_core::error::AppError;
use ecotrace_database::repositories::notification::NotificationRepository;
use ecotrace_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages a recipient's notifications: listing, read state, deletion.
///
/// Read and delete operations are idempotent: re-marking an already-read
/// row is a silent no-op; deleting an unknown id surfaces `NotFound` so
/// the caller can refresh, nothing more.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
    /// Listing cap per fetch.
    list_limit: i64,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>, config: &NotifyConfig) -> Self {
        Self {
            notification_repo,
            list_limit: config.max_stored_per_recipient,
        }
    }

    /// Lists the current recipient's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AppError> {
        self.notification_repo
            .find_for_recipient(ctx.user_id, ctx.role, unread_only, self.list_limit)
            .await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.notification_repo
            .count_unread(ctx.user_id, ctx.role)
            .await
    }

    /// Marks one notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        self.notification_repo
            .mark_read(notification_id, ctx.user_id, ctx.role)
            .await
    }

    /// Marks all of the recipient's notifications as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        let marked = self
            .notification_repo
            .mark_all_read(ctx.user_id, ctx.role)
            .await?;
        info!(user_id = %ctx.user_id, marked, "Marked all notifications read");
        Ok(marked)
    }

    /// Deletes one notification. Unknown ids yield `NotFound`, which the
    /// API layer reports without treating the action as fatal.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        let removed = self
            .notification_repo
            .delete(notification_id, ctx.user_id, ctx.role)
            .await?;
        if !removed {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    /// Deletes every notification of the recipient.
    pub async fn clear_all(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let removed = self
            .notification_repo
            .clear_all(ctx.user_id, ctx.role)
            .await?;
        info!(user_id = %ctx.user_id, removed, "Cleared notifications");
        Ok(removed)
    }
}
