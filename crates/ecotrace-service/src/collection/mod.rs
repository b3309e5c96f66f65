//! Scheduling and the two-phase transport handshake.

pub mod service;

pub use service::{
    CancelInput, CollectionService, ConfirmDeliveryInput, ExtraItemInput, ScheduleCollectionInput,
};
