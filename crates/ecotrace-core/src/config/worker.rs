//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background maintenance worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the maintenance scheduler runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the notification cleanup task.
    #[serde(default = "default_notification_cleanup_cron")]
    pub notification_cleanup_cron: String,
    /// Cron expression for the expired session cleanup task.
    #[serde(default = "default_session_cleanup_cron")]
    pub session_cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notification_cleanup_cron: default_notification_cleanup_cron(),
            session_cleanup_cron: default_session_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_cleanup_cron() -> String {
    // Every day at 03:00
    "0 0 3 * * *".to_string()
}

fn default_session_cleanup_cron() -> String {
    // Every 15 minutes
    "0 */15 * * * *".to_string()
}
