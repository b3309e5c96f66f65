//! Collection-request entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::options::{CollectionMode, QuantityBucket, RequestPriority, TimeSlot, WasteType};
use super::status::RequestStatus;

/// A citizen or company request for waste collection.
///
/// Requests are never hard-deleted; the approval gate and the scheduler
/// only move them forward through [`RequestStatus`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Human-readable reference (`COL-<year>-<nnn>`).
    pub reference: String,
    /// The submitting user.
    pub requester_id: Uuid,
    /// Declared waste type.
    pub waste_type: WasteType,
    /// Free-text description of the waste.
    pub description: String,
    /// Estimated quantity bucket.
    pub quantity: Option<QuantityBucket>,
    /// On-site pickup or voluntary drop-off.
    pub mode: CollectionMode,
    /// Date the requester would like the pickup.
    pub desired_date: NaiveDate,
    /// Preferred time slot.
    pub time_slot: TimeSlot,
    /// Pickup address (required for `domicile` mode).
    pub address: String,
    /// Contact phone number.
    pub phone: String,
    /// Special instructions for the crew.
    pub special_instructions: Option<String>,
    /// Optional photo URL references.
    pub photo_urls: Vec<String>,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// Priority set by the administrator at approval.
    pub priority: Option<RequestPriority>,
    /// Mandatory motive recorded on rejection.
    pub rejection_motive: Option<String>,
    /// Free-text notes left by the reviewing administrator.
    pub admin_notes: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the approval gate decided (approve or reject).
    pub decided_at: Option<DateTime<Utc>>,
}

impl CollectionRequest {
    /// Whether the approval gate may still act on this request.
    pub fn awaiting_decision(&self) -> bool {
        self.status.awaiting_decision()
    }

    /// Whether this request is eligible for scheduling.
    pub fn schedulable(&self) -> bool {
        self.status == RequestStatus::Approuvee
    }
}

/// Data required to create a new collection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// The submitting user.
    pub requester_id: Uuid,
    /// Declared waste type.
    pub waste_type: WasteType,
    /// Free-text description.
    pub description: String,
    /// Estimated quantity bucket.
    pub quantity: Option<QuantityBucket>,
    /// Collection mode.
    pub mode: CollectionMode,
    /// Desired pickup date.
    pub desired_date: NaiveDate,
    /// Preferred time slot.
    pub time_slot: TimeSlot,
    /// Pickup address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Special instructions.
    pub special_instructions: Option<String>,
    /// Photo URL references.
    pub photo_urls: Vec<String>,
}
