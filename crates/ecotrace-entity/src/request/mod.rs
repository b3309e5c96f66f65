//! Collection-request ("formulaire") domain entities.

pub mod model;
pub mod options;
pub mod status;

pub use model::CollectionRequest;
pub use options::{CollectionMode, QuantityBucket, RequestPriority, TimeSlot, WasteType};
pub use status::RequestStatus;
