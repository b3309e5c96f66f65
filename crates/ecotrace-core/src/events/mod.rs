//! Domain events emitted by EcoTrace workflow operations.
//!
//! Every state transition in the request / collection / waste lifecycle
//! produces one event. Events are consumed by the notifier, which turns
//! them into per-role and per-user notifications.

pub mod collection;
pub mod request;
pub mod waste;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use collection::CollectionEvent;
pub use request::RequestEvent;
pub use waste::WasteEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A collection-request event.
    Request(RequestEvent),
    /// A scheduled-collection event.
    Collection(CollectionEvent),
    /// A waste-item event.
    Waste(WasteEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
