//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours (matches the refresh token TTL).
    #[serde(default = "default_lifetime")]
    pub lifetime_hours: u64,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_hours: default_lifetime(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_lifetime() -> u64 {
    24
}

fn default_cleanup_interval() -> u64 {
    15
}
