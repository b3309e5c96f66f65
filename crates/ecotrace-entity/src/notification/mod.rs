//! Notification domain entities.

pub mod kind;
pub mod model;

pub use kind::{NotificationCategory, NotificationKind, NotificationPriority};
pub use model::{CreateNotification, Notification};
