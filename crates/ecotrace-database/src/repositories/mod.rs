//! Repository implementations for all EcoTrace entities.

pub mod collection;
pub mod notification;
pub mod request;
pub mod session;
pub mod user;
pub mod waste;

pub use collection::CollectionRepository;
pub use notification::NotificationRepository;
pub use request::RequestRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
pub use waste::WasteRepository;
