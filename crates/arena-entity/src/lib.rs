//! # arena-entity
//!
//! Domain entity models for ArenaHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod actor;
pub mod booking;
pub mod field;
pub mod payment;
pub mod stadium;
pub mod staff;
