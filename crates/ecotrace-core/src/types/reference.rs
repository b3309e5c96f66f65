//! Human-readable reference codes for requests and collections.
//!
//! References follow the `COL-2026-042` / `RDV-2026-007` shape: a kind
//! prefix, the creation year, and a zero-padded daily sequence number.
//! Sequence allocation lives in the repositories (it needs a count); this
//! module only knows how to format candidates and the collision fallback.

use uuid::Uuid;

/// Which entity a reference identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A collection request ("formulaire").
    Request,
    /// A scheduled collection ("collecte").
    Collection,
}

impl ReferenceKind {
    /// Return the reference prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Request => "COL",
            Self::Collection => "RDV",
        }
    }

    /// Format a sequential reference candidate.
    pub fn sequential(&self, year: i32, seq: i64) -> String {
        format!("{}-{}-{:03}", self.prefix(), year, seq)
    }

    /// Format a collision-proof fallback reference with a random suffix.
    ///
    /// Used when every sequential candidate is taken.
    pub fn fallback(&self, year: i32) -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
        format!("{}-{}-{}", self.prefix(), year, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_format() {
        assert_eq!(ReferenceKind::Request.sequential(2026, 7), "COL-2026-007");
        assert_eq!(
            ReferenceKind::Collection.sequential(2026, 123),
            "RDV-2026-123"
        );
    }

    #[test]
    fn test_fallback_shape() {
        let reference = ReferenceKind::Request.fallback(2026);
        assert!(reference.starts_with("COL-2026-"));
        assert_eq!(reference.len(), "COL-2026-".len() + 6);
        assert!(
            reference["COL-2026-".len()..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
