//! User self-service and directory operations.

pub mod service;

pub use service::{RegisterInput, UpdateProfileInput, UserService};
