//! Waste-item (valorization) domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to technician processing of waste items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WasteEvent {
    /// A technician started processing a waste item.
    ValorizationStarted {
        /// The waste item ID.
        item_id: Uuid,
        /// The processing technician.
        technician_id: Uuid,
    },
    /// A technician finalized a waste item (recycled or destroyed).
    ValorizationFinalized {
        /// The waste item ID.
        item_id: Uuid,
        /// The requester behind the originating collection.
        requester_id: Uuid,
        /// Outcome as a display string (`a_recycler` / `a_detruire`).
        outcome: String,
        /// Yield percentage recorded by the technician.
        yield_pct: Option<f64>,
    },
}
