//! Scheduled-collection domain events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the scheduling and transport phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CollectionEvent {
    /// Logistics converted an approved request into a scheduled collection.
    Scheduled {
        /// The collection ID.
        collection_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
        /// The assigned transporter, when assignment was not deferred.
        transporter_id: Option<Uuid>,
        /// Planned pickup date.
        scheduled_date: NaiveDate,
    },
    /// A transporter was assigned to an already scheduled collection.
    TransporterAssigned {
        /// The collection ID.
        collection_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The newly assigned transporter.
        transporter_id: Uuid,
        /// Planned pickup date.
        scheduled_date: NaiveDate,
    },
    /// The assigned transporter confirmed physical receipt.
    ReceptionConfirmed {
        /// The collection ID.
        collection_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
    },
    /// The assigned transporter confirmed delivery to the technicians.
    DeliveryConfirmed {
        /// The collection ID.
        collection_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
        /// Number of waste items produced by the delivery.
        item_count: usize,
    },
    /// The collection was cancelled.
    Cancelled {
        /// The collection ID.
        collection_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
        /// The assigned transporter to notify, if any.
        transporter_id: Option<Uuid>,
        /// The mandatory cancellation motive.
        motive: String,
    },
}
