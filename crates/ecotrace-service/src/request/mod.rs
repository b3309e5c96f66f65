//! Request intake and the approval gate.

pub mod service;

pub use service::{ApproveInput, RejectInput, RequestService, SubmitRequestInput};
