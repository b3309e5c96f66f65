//! Enumerated field values for collection requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of electronic waste declared on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "waste_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    /// Desktop or laptop computer.
    Ordinateur,
    /// Smartphone or tablet.
    Smartphone,
    /// Household appliance.
    Electromenager,
    /// Television or monitor.
    Televiseur,
    /// Loose electronic components.
    Composants,
    /// Anything else.
    Autres,
}

impl WasteType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinateur => "ordinateur",
            Self::Smartphone => "smartphone",
            Self::Electromenager => "electromenager",
            Self::Televiseur => "televiseur",
            Self::Composants => "composants",
            Self::Autres => "autres",
        }
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Estimated quantity bucket declared on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quantity_bucket")]
pub enum QuantityBucket {
    /// 1 to 5 kilograms.
    #[sqlx(rename = "1-5kg")]
    #[serde(rename = "1-5kg")]
    Kg1To5,
    /// 5 to 10 kilograms.
    #[sqlx(rename = "5-10kg")]
    #[serde(rename = "5-10kg")]
    Kg5To10,
    /// 10 to 20 kilograms.
    #[sqlx(rename = "10-20kg")]
    #[serde(rename = "10-20kg")]
    Kg10To20,
    /// More than 20 kilograms.
    #[sqlx(rename = "20kg+")]
    #[serde(rename = "20kg+")]
    KgOver20,
}

impl QuantityBucket {
    /// Midpoint of the bucket in kilograms, used when a collection is
    /// delivered without a measured quantity.
    pub fn midpoint_kg(&self) -> f64 {
        match self {
            Self::Kg1To5 => 3.0,
            Self::Kg5To10 => 7.5,
            Self::Kg10To20 => 15.0,
            Self::KgOver20 => 25.0,
        }
    }
}

/// Preferred pickup time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "time_slot", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// Morning (8h-12h).
    Matin,
    /// Afternoon (14h-18h).
    ApresMidi,
    /// Any time works.
    Flexible,
}

/// How the waste reaches the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "collection_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// Pickup at the requester's address.
    Domicile,
    /// The requester drops the waste at a collection point.
    Apport,
}

/// Priority assigned by the administrator at approval time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    /// Low priority.
    Basse,
    /// Default priority.
    Normale,
    /// High priority.
    Haute,
    /// Urgent, handle first.
    Urgente,
}

impl Default for RequestPriority {
    fn default() -> Self {
        Self::Normale
    }
}

impl RequestPriority {
    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basse => "basse",
            Self::Normale => "normale",
            Self::Haute => "haute",
            Self::Urgente => "urgente",
        }
    }
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bucket_serde_names() {
        let json = serde_json::to_string(&QuantityBucket::KgOver20).unwrap();
        assert_eq!(json, "\"20kg+\"");
        let parsed: QuantityBucket = serde_json::from_str("\"1-5kg\"").unwrap();
        assert_eq!(parsed, QuantityBucket::Kg1To5);
    }

    #[test]
    fn test_bucket_midpoints_ordered() {
        assert!(QuantityBucket::Kg1To5.midpoint_kg() < QuantityBucket::Kg5To10.midpoint_kg());
        assert!(QuantityBucket::Kg10To20.midpoint_kg() < QuantityBucket::KgOver20.midpoint_kg());
    }
}
