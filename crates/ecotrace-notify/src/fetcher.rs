//! The notification fetch seam.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecotrace_core::result::AppResult;
use ecotrace_database::repositories::notification::NotificationRepository;
use ecotrace_entity::notification::Notification;
use ecotrace_entity::user::UserRole;

/// Who a watcher polls notifications for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// The recipient user.
    pub user_id: Uuid,
    /// The recipient's role (role-wide notifications are included).
    pub role: UserRole,
}

/// Source of notification batches for a watcher.
///
/// Production uses [`RepositoryFetcher`]; tests substitute a mock to drive
/// the watcher without a database.
#[async_trait]
pub trait NotificationFetcher: Send + Sync {
    /// Fetch the current notification list for a recipient, newest first.
    async fn fetch(&self, recipient: &Recipient) -> AppResult<Vec<Notification>>;
}

/// Repository-backed fetcher.
#[derive(Debug, Clone)]
pub struct RepositoryFetcher {
    /// Notification repository.
    repo: Arc<NotificationRepository>,
    /// Per-fetch cap.
    limit: i64,
}

impl RepositoryFetcher {
    /// Creates a new repository-backed fetcher.
    pub fn new(repo: Arc<NotificationRepository>, limit: i64) -> Self {
        Self { repo, limit }
    }
}

#[async_trait]
impl NotificationFetcher for RepositoryFetcher {
    async fn fetch(&self, recipient: &Recipient) -> AppResult<Vec<Notification>> {
        self.repo
            .find_for_recipient(recipient.user_id, recipient.role, false, self.limit)
            .await
    }
}
