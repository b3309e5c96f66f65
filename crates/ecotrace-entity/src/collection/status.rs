//! Scheduled-collection lifecycle states and transition guard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a scheduled collection.
///
/// The transport handshake is two-phase: the assigned transporter first
/// confirms physical receipt (`PLANIFIEE` to `EN_COURS`), then confirms
/// delivery to the technicians (`EN_COURS` to `TERMINEE`). `ANNULEE` is the
/// cancellation escape from either non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "collection_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    /// Scheduled; transporter may still be unassigned.
    Planifiee,
    /// Receipt confirmed; waste is in transit.
    EnCours,
    /// Delivery confirmed. Terminal.
    Terminee,
    /// Cancelled. Terminal.
    Annulee,
}

impl CollectionStatus {
    /// The single transition guard for collections.
    ///
    /// Monotonic: no skipping `EN_COURS`, no backward moves, terminal
    /// states are immutable.
    pub fn can_transition(self, to: CollectionStatus) -> bool {
        matches!(
            (self, to),
            (Self::Planifiee, Self::EnCours)
                | (Self::EnCours, Self::Terminee)
                | (Self::Planifiee, Self::Annulee)
                | (Self::EnCours, Self::Annulee)
        )
    }

    /// Whether this state is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminee | Self::Annulee)
    }

    /// Whether transporter assignment is still allowed.
    pub fn assignable(self) -> bool {
        matches!(self, Self::Planifiee)
    }

    /// Return the status as its canonical uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planifiee => "PLANIFIEE",
            Self::EnCours => "EN_COURS",
            Self::Terminee => "TERMINEE",
            Self::Annulee => "ANNULEE",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_phase_handshake_is_monotonic() {
        assert!(CollectionStatus::Planifiee.can_transition(CollectionStatus::EnCours));
        assert!(CollectionStatus::EnCours.can_transition(CollectionStatus::Terminee));
        // No skipping the receipt phase.
        assert!(!CollectionStatus::Planifiee.can_transition(CollectionStatus::Terminee));
        // No backward moves.
        assert!(!CollectionStatus::EnCours.can_transition(CollectionStatus::Planifiee));
        assert!(!CollectionStatus::Terminee.can_transition(CollectionStatus::EnCours));
    }

    #[test]
    fn test_cancellation_escape() {
        assert!(CollectionStatus::Planifiee.can_transition(CollectionStatus::Annulee));
        assert!(CollectionStatus::EnCours.can_transition(CollectionStatus::Annulee));
        assert!(!CollectionStatus::Terminee.can_transition(CollectionStatus::Annulee));
        assert!(!CollectionStatus::Annulee.can_transition(CollectionStatus::Annulee));
    }

    #[test]
    fn test_terminal_states_immutable() {
        for terminal in [CollectionStatus::Terminee, CollectionStatus::Annulee] {
            assert!(terminal.is_terminal());
            for target in [
                CollectionStatus::Planifiee,
                CollectionStatus::EnCours,
                CollectionStatus::Terminee,
                CollectionStatus::Annulee,
            ] {
                assert!(!terminal.can_transition(target));
            }
        }
    }

    #[test]
    fn test_assignment_window() {
        assert!(CollectionStatus::Planifiee.assignable());
        assert!(!CollectionStatus::EnCours.assignable());
        assert!(!CollectionStatus::Terminee.assignable());
    }
}
