//! Waste-item processing states and valorization outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing state of a waste item on the technician's bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "waste_item_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WasteItemStatus {
    /// Received from a delivered collection, not yet picked up.
    Nouveau,
    /// A technician started valorization.
    EnCours,
    /// Valorized (recycled or destroyed). Terminal.
    Termine,
}

impl WasteItemStatus {
    /// The single transition guard for waste items.
    ///
    /// Valorization is strictly forward and terminal: an item is never
    /// re-processed once `termine`.
    pub fn can_transition(self, to: WasteItemStatus) -> bool {
        matches!(
            (self, to),
            (Self::Nouveau, Self::EnCours) | (Self::EnCours, Self::Termine)
        )
    }

    /// Whether this state is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Termine)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nouveau => "nouveau",
            Self::EnCours => "en_cours",
            Self::Termine => "termine",
        }
    }
}

impl fmt::Display for WasteItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final destination decided by the technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "valorization_outcome", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ValorizationOutcome {
    /// Material goes to the recycling stream.
    ARecycler,
    /// Material is destroyed.
    ADetruire,
}

impl ValorizationOutcome {
    /// Return the outcome as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ARecycler => "a_recycler",
            Self::ADetruire => "a_detruire",
        }
    }
}

impl fmt::Display for ValorizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valorization_is_forward_only() {
        assert!(WasteItemStatus::Nouveau.can_transition(WasteItemStatus::EnCours));
        assert!(WasteItemStatus::EnCours.can_transition(WasteItemStatus::Termine));
        assert!(!WasteItemStatus::Nouveau.can_transition(WasteItemStatus::Termine));
        assert!(!WasteItemStatus::EnCours.can_transition(WasteItemStatus::Nouveau));
    }

    #[test]
    fn test_termine_is_terminal() {
        assert!(WasteItemStatus::Termine.is_terminal());
        for target in [
            WasteItemStatus::Nouveau,
            WasteItemStatus::EnCours,
            WasteItemStatus::Termine,
        ] {
            assert!(!WasteItemStatus::Termine.can_transition(target));
        }
    }
}
