//! Collection-request domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the request intake and approval gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestEvent {
    /// A requester submitted a new collection request.
    Submitted {
        /// The request ID.
        request_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester.
        requester_id: Uuid,
        /// The requester's username (for message text).
        requester_name: String,
    },
    /// An administrator approved a request.
    Approved {
        /// The request ID.
        request_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
        /// Priority assigned at approval.
        priority: String,
    },
    /// An administrator rejected a request.
    Rejected {
        /// The request ID.
        request_id: Uuid,
        /// Human-readable reference.
        reference: String,
        /// The requester to notify.
        requester_id: Uuid,
        /// The mandatory rejection motive.
        motive: String,
    },
}
