//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use ecotrace_core::error::{AppError, ErrorKind};
use ecotrace_core::result::AppResult;
use ecotrace_entity::notification::{CreateNotification, Notification};
use ecotrace_entity::user::UserRole;

/// Repository for notification CRUD operations.
///
/// A recipient is always the pair (user id, role): listing returns rows
/// addressed to the user plus unexpired role-wide rows for their role.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List notifications for a recipient, newest first.
    pub async fn find_for_recipient(
        &self,
        user_id: Uuid,
        role: UserRole,
        unread_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE (user_id = $1 OR (user_id IS NULL AND target_role = $2)) \
               AND (expires_at IS NULL OR expires_at > NOW()) \
               AND (NOT $3 OR is_read = FALSE) \
             ORDER BY created_at DESC LIMIT $4",
        )
        .bind(user_id)
        .bind(role)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    /// Count unread notifications for a recipient.
    pub async fn count_unread(&self, user_id: Uuid, role: UserRole) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE (user_id = $1 OR (user_id IS NULL AND target_role = $2)) \
               AND (expires_at IS NULL OR expires_at > NOW()) \
               AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Create a notification.
    pub async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
                (title, message, kind, category, priority, user_id, target_role, \
                 action_url, resource_type, resource_id, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.kind)
        .bind(data.category)
        .bind(data.priority)
        .bind(data.user_id)
        .bind(data.target_role)
        .bind(&data.action_url)
        .bind(&data.resource_type)
        .bind(data.resource_id)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })
    }

    /// Mark a notification as read. Re-marking an already-read row is a
    /// no-op, not an error.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid, role: UserRole) -> AppResult<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE id = $1 AND is_read = FALSE \
               AND (user_id = $2 OR (user_id IS NULL AND target_role = $3))",
        )
        .bind(notification_id)
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(())
    }

    /// Mark all of a recipient's notifications as read.
    pub async fn mark_all_read(&self, user_id: Uuid, role: UserRole) -> AppResult<i64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE (user_id = $1 OR (user_id IS NULL AND target_role = $2)) \
               AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected() as i64)
    }

    /// Delete one notification. Returns whether a row was actually removed
    /// so the service can signal `NotFound` without failing the caller.
    pub async fn delete(&self, notification_id: Uuid, user_id: Uuid, role: UserRole) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM notifications \
             WHERE id = $1 AND (user_id = $2 OR (user_id IS NULL AND target_role = $3))",
        )
        .bind(notification_id)
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every notification of a recipient.
    pub async fn clear_all(&self, user_id: Uuid, role: UserRole) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications \
             WHERE user_id = $1 OR (user_id IS NULL AND target_role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear notifications", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Purge expired notifications.
    pub async fn delete_expired(&self) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at < NOW()")
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Keep only the latest N user-addressed notifications per recipient.
    pub async fn trim_per_recipient(&self, limit: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN (\
                SELECT id FROM (\
                    SELECT id, ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY created_at DESC) as r_num \
                    FROM notifications WHERE user_id IS NOT NULL\
                ) t WHERE t.r_num > $1\
             )",
        )
        .bind(limit)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trim notifications", e))?;

        Ok(result.rows_affected())
    }
}
