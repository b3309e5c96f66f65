//! # ecotrace-service
//!
//! Business logic service layer for EcoTrace. Each service orchestrates
//! repositories and auth to implement one stage of the waste-collection
//! workflow: intake, approval, scheduling, transport, valorization, and
//! notification fan-out.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references. Every state mutation is
//! guarded twice: by the entity's transition table before the write, and
//! by a state-conditional `UPDATE` in the repository so concurrent actors
//! lose cleanly with an invalid-transition error.

pub mod collection;
pub mod context;
pub mod notification;
pub mod report;
pub mod request;
pub mod user;
pub mod waste;

pub use collection::CollectionService;
pub use context::RequestContext;
pub use notification::{NotificationService, Notifier};
pub use report::DashboardService;
pub use request::RequestService;
pub use user::UserService;
pub use waste::WasteService;
