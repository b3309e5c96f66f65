//! # ecotrace-worker
//!
//! Cron-scheduled maintenance for EcoTrace: purging expired notifications,
//! trimming per-recipient backlogs, and deleting stale sessions.

pub mod scheduler;

pub use scheduler::MaintenanceScheduler;
