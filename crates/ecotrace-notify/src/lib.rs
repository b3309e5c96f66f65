//! # ecotrace-notify
//!
//! In-process notification delivery for EcoTrace dashboards.
//!
//! A [`NotificationWatcher`] owns a single polling timer per recipient
//! subscription and fans every fetched batch out to the listeners
//! registered in a [`ListenerRegistry`]. Fetching goes through the
//! [`NotificationFetcher`] seam so production pulls from PostgreSQL while
//! tests inject a mock. When the store is unreachable the watcher can
//! deliver clearly marked synthetic samples, but only when that fallback
//! is explicitly enabled in configuration.

pub mod fallback;
pub mod fetcher;
pub mod listener;
pub mod watcher;

pub use fetcher::{NotificationFetcher, Recipient, RepositoryFetcher};
pub use listener::{ListenerId, ListenerRegistry};
pub use watcher::NotificationWatcher;
