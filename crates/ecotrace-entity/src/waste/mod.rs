//! Waste-item ("dechet") domain entities.

pub mod model;
pub mod status;

pub use model::WasteItem;
pub use status::{ValorizationOutcome, WasteItemStatus};
