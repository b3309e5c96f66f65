//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles in the EcoTrace workflow.
///
/// Requesters (individuals and companies) submit collection requests,
/// administrators and logistics managers review and plan them, transporters
/// move the waste, and technicians valorize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Private individual submitting collection requests.
    Particulier,
    /// Company submitting collection requests.
    Entreprise,
    /// Confirms physical receipt and delivery of collections.
    Transporteur,
    /// Processes (recycles or destroys) delivered waste items.
    Technicien,
    /// Full administrator; reviews requests and manages users.
    Administrateur,
    /// Logistics manager; plans collections and assigns transporters.
    ResponsableLogistique,
}

impl UserRole {
    /// Whether this role submits collection requests.
    pub fn is_requester(&self) -> bool {
        matches!(self, Self::Particulier | Self::Entreprise)
    }

    /// Whether this role may approve or reject requests.
    pub fn can_review_requests(&self) -> bool {
        matches!(self, Self::Administrateur | Self::ResponsableLogistique)
    }

    /// Whether this role may schedule collections and assign transporters.
    pub fn can_schedule(&self) -> bool {
        matches!(self, Self::Administrateur | Self::ResponsableLogistique)
    }

    /// Whether this role is an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Administrateur)
    }

    /// Return the role as its canonical uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Particulier => "PARTICULIER",
            Self::Entreprise => "ENTREPRISE",
            Self::Transporteur => "TRANSPORTEUR",
            Self::Technicien => "TECHNICIEN",
            Self::Administrateur => "ADMINISTRATEUR",
            Self::ResponsableLogistique => "RESPONSABLE_LOGISTIQUE",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ecotrace_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PARTICULIER" => Ok(Self::Particulier),
            "ENTREPRISE" => Ok(Self::Entreprise),
            "TRANSPORTEUR" => Ok(Self::Transporteur),
            "TECHNICIEN" => Ok(Self::Technicien),
            "ADMINISTRATEUR" => Ok(Self::Administrateur),
            "RESPONSABLE_LOGISTIQUE" => Ok(Self::ResponsableLogistique),
            _ => Err(ecotrace_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: PARTICULIER, ENTREPRISE, \
                 TRANSPORTEUR, TECHNICIEN, ADMINISTRATEUR, RESPONSABLE_LOGISTIQUE"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::Particulier.is_requester());
        assert!(UserRole::Entreprise.is_requester());
        assert!(!UserRole::Transporteur.is_requester());
        assert!(UserRole::Administrateur.can_review_requests());
        assert!(UserRole::ResponsableLogistique.can_schedule());
        assert!(!UserRole::Technicien.can_review_requests());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "ADMINISTRATEUR".parse::<UserRole>().unwrap(),
            UserRole::Administrateur
        );
        assert_eq!(
            "responsable_logistique".parse::<UserRole>().unwrap(),
            UserRole::ResponsableLogistique
        );
        assert!("invalid".parse::<UserRole>().is_err());
    }
}
