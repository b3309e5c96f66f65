//! Scheduled-collection entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::CollectionStatus;

/// A concrete scheduled pickup derived from exactly one approved request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Collection {
    /// Unique collection identifier.
    pub id: Uuid,
    /// Human-readable reference (`RDV-<year>-<nnn>`).
    pub reference: String,
    /// The originating request (one-to-one).
    pub request_id: Uuid,
    /// The requester behind the originating request.
    pub requester_id: Uuid,
    /// Assigned transporter; null while assignment is deferred.
    pub transporter_id: Option<Uuid>,
    /// Planned pickup date.
    pub scheduled_date: NaiveDate,
    /// Pickup address (copied from the request).
    pub address: String,
    /// Contact phone (copied from the request).
    pub phone: String,
    /// Free-text instructions from logistics.
    pub instructions: Option<String>,
    /// Current lifecycle state.
    pub status: CollectionStatus,
    /// Notes recorded at receipt confirmation.
    pub reception_notes: Option<String>,
    /// Notes recorded at delivery confirmation.
    pub delivery_notes: Option<String>,
    /// Motive recorded on cancellation.
    pub cancellation_motive: Option<String>,
    /// When receipt was confirmed.
    pub received_at: Option<DateTime<Utc>>,
    /// When delivery was confirmed.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the collection was scheduled.
    pub created_at: DateTime<Utc>,
    /// When the collection was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Whether the given user is the assigned transporter.
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.transporter_id == Some(user_id)
    }

    /// Whether this collection still accepts transporter assignment.
    pub fn assignable(&self) -> bool {
        self.status.assignable()
    }
}

/// Data required to schedule a new collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollection {
    /// The originating approved request.
    pub request_id: Uuid,
    /// The requester behind the request.
    pub requester_id: Uuid,
    /// Deferred-nullable transporter assignment.
    pub transporter_id: Option<Uuid>,
    /// Planned pickup date.
    pub scheduled_date: NaiveDate,
    /// Pickup address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Instructions from logistics.
    pub instructions: Option<String>,
}
