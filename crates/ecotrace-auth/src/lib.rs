//! # ecotrace-auth
//!
//! Authentication and session management for EcoTrace.
//!
//! ## Modules
//!
//! - `jwt` — JWT access/refresh token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `session` — Session lifecycle management (login, refresh, logout)

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::SessionManager;
