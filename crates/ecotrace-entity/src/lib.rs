//! # ecotrace-entity
//!
//! Domain entity models for EcoTrace. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! Status enums carry their transition guards: each lifecycle enum exposes
//! a single `can_transition` function that encodes the full guard table,
//! and the service layer refuses any move the guard does not allow.

pub mod collection;
pub mod notification;
pub mod request;
pub mod session;
pub mod user;
pub mod waste;
