//! Notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Notification polling, retention, and fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Polling interval for notification watchers in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Whether to deliver synthetic sample notifications when the store
    /// is unreachable. Off by default; synthetic rows are always marked.
    #[serde(default)]
    pub fallback_enabled: bool,
    /// Days after which a notification expires.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
    /// Maximum notifications retained per recipient.
    #[serde(default = "default_max_per_recipient")]
    pub max_stored_per_recipient: i64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            fallback_enabled: false,
            expiry_days: default_expiry_days(),
            max_stored_per_recipient: default_max_per_recipient(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_expiry_days() -> i64 {
    30
}

fn default_max_per_recipient() -> i64 {
    200
}
