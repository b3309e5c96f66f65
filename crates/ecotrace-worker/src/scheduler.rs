//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use ecotrace_core::config::{NotifyConfig, WorkerConfig};
use ecotrace_core::error::AppError;
use ecotrace_database::repositories::notification::NotificationRepository;
use ecotrace_database::repositories::session::SessionRepository;

/// Cron-based scheduler for periodic maintenance tasks.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Notification repository for cleanup tasks.
    notification_repo: Arc<NotificationRepository>,
    /// Session repository for stale-session cleanup.
    session_repo: Arc<SessionRepository>,
    /// Worker configuration (cron expressions).
    worker_config: WorkerConfig,
    /// Notification retention settings.
    notify_config: NotifyConfig,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler.
    pub async fn new(
        notification_repo: Arc<NotificationRepository>,
        session_repo: Arc<SessionRepository>,
        worker_config: WorkerConfig,
        notify_config: NotifyConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            notification_repo,
            session_repo,
            worker_config,
            notify_config,
        })
    }

    /// Register all maintenance tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_notification_cleanup().await?;
        self.register_session_cleanup().await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Notification cleanup: purge expired rows, trim per-recipient backlog.
    async fn register_notification_cleanup(&self) -> Result<(), AppError> {
        let repo = Arc::clone(&self.notification_repo);
        let max_per_recipient = self.notify_config.max_stored_per_recipient;
        let cron = self.worker_config.notification_cleanup_cron.clone();

        let job = CronJob::new_async(cron.as_str(), move |_uuid, _lock| {
            let repo = Arc::clone(&repo);
            Box::pin(async move {
                match repo.delete_expired().await {
                    Ok(purged) => info!(purged, "Purged expired notifications"),
                    Err(e) => error!("Notification purge failed: {e}"),
                }
                match repo.trim_per_recipient(max_per_recipient).await {
                    Ok(trimmed) => info!(trimmed, "Trimmed notification backlog"),
                    Err(e) => error!("Notification trim failed: {e}"),
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create notification_cleanup schedule: {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add notification_cleanup schedule: {e}"))
        })?;

        info!(cron = %cron, "Registered: notification_cleanup");
        Ok(())
    }

    /// Session cleanup: delete long-expired and revoked sessions.
    async fn register_session_cleanup(&self) -> Result<(), AppError> {
        let repo = Arc::clone(&self.session_repo);
        let cron = self.worker_config.session_cleanup_cron.clone();

        let job = CronJob::new_async(cron.as_str(), move |_uuid, _lock| {
            let repo = Arc::clone(&repo);
            Box::pin(async move {
                let cutoff = Utc::now() - Duration::days(7);
                match repo.delete_stale(cutoff).await {
                    Ok(removed) => info!(removed, "Deleted stale sessions"),
                    Err(e) => error!("Session cleanup failed: {e}"),
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create session_cleanup schedule: {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add session_cleanup schedule: {e}"))
        })?;

        info!(cron = %cron, "Registered: session_cleanup");
        Ok(())
    }
}
