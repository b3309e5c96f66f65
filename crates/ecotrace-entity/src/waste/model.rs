//! Waste-item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::request::WasteType;

use super::status::{ValorizationOutcome, WasteItemStatus};

/// A physical waste batch produced when a collection is delivered.
///
/// One base item reflects the originating request's declared type and
/// quantity; supplementary items are extras the transporter discovered
/// on-site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WasteItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// The delivered collection this item came from.
    pub collection_id: Uuid,
    /// Waste type.
    pub waste_type: WasteType,
    /// Free-text category refinement (e.g. "carte mere", "batterie").
    pub category: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Quantity in kilograms.
    pub quantity_kg: f64,
    /// Whether this item was discovered on-site by the transporter.
    pub supplementary: bool,
    /// Current processing state.
    pub status: WasteItemStatus,
    /// Outcome decided at finalization.
    pub outcome: Option<ValorizationOutcome>,
    /// Quantity actually valorized in kilograms.
    pub quantity_valorized_kg: Option<f64>,
    /// Yield percentage recorded at finalization.
    pub yield_pct: Option<f64>,
    /// The technician processing this item.
    pub technician_id: Option<Uuid>,
    /// Notes left by the technician.
    pub technician_notes: Option<String>,
    /// When the item was created (delivery confirmation time).
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
    /// When valorization was finalized.
    pub processed_at: Option<DateTime<Utc>>,
}

impl WasteItem {
    /// Whether a technician may still start work on this item.
    pub fn startable(&self) -> bool {
        self.status == WasteItemStatus::Nouveau
    }

    /// Whether this item has been fully valorized.
    pub fn valorized(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Data required to create a waste item at delivery confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWasteItem {
    /// The delivered collection.
    pub collection_id: Uuid,
    /// Waste type.
    pub waste_type: WasteType,
    /// Category refinement.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Quantity in kilograms.
    pub quantity_kg: f64,
    /// Whether this is an on-site discovery.
    pub supplementary: bool,
}
