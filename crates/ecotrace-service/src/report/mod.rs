//! Dashboard reporting.

pub mod dashboard;

pub use dashboard::{DashboardService, DashboardStats};
