//! Collection-request lifecycle states and transition guard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a collection request.
///
/// `EN_ATTENTE` is the submission state. The approval gate moves a request
/// to `APPROUVEE` or `REJETEE`; scheduling then denormalizes `PLANIFIEE`
/// onto approved requests once a collection references them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Submitted, awaiting the administrator's decision.
    EnAttente,
    /// Approved; eligible for scheduling.
    Approuvee,
    /// Rejected with a motive. Terminal.
    Rejetee,
    /// A collection has been scheduled from this request.
    Planifiee,
}

impl RequestStatus {
    /// The single transition guard for requests.
    ///
    /// Every mutation of a request's status must pass through this table;
    /// anything it refuses is an `InvalidState` error at the service layer.
    pub fn can_transition(self, to: RequestStatus) -> bool {
        matches!(
            (self, to),
            (Self::EnAttente, Self::Approuvee)
                | (Self::EnAttente, Self::Rejetee)
                | (Self::Approuvee, Self::Planifiee)
        )
    }

    /// Whether the approval gate may still act on this request.
    pub fn awaiting_decision(self) -> bool {
        matches!(self, Self::EnAttente)
    }

    /// Return the status as its canonical uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnAttente => "EN_ATTENTE",
            Self::Approuvee => "APPROUVEE",
            Self::Rejetee => "REJETEE",
            Self::Planifiee => "PLANIFIEE",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_only_from_pending() {
        assert!(RequestStatus::EnAttente.can_transition(RequestStatus::Approuvee));
        assert!(RequestStatus::EnAttente.can_transition(RequestStatus::Rejetee));
        assert!(!RequestStatus::Approuvee.can_transition(RequestStatus::Rejetee));
        assert!(!RequestStatus::Rejetee.can_transition(RequestStatus::Approuvee));
        assert!(!RequestStatus::Planifiee.can_transition(RequestStatus::Approuvee));
    }

    #[test]
    fn test_scheduling_only_from_approved() {
        assert!(RequestStatus::Approuvee.can_transition(RequestStatus::Planifiee));
        assert!(!RequestStatus::EnAttente.can_transition(RequestStatus::Planifiee));
        assert!(!RequestStatus::Rejetee.can_transition(RequestStatus::Planifiee));
    }

    #[test]
    fn test_no_backward_transitions() {
        for status in [
            RequestStatus::Approuvee,
            RequestStatus::Rejetee,
            RequestStatus::Planifiee,
        ] {
            assert!(!status.can_transition(RequestStatus::EnAttente));
        }
    }
}
