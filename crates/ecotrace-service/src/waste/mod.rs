//! Technician valorization of delivered waste items.

pub mod service;

pub use service::{FinalizeValorizationInput, WasteService};
