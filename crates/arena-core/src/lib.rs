//! # arena-core
//!
//! Core crate for ArenaHub. Contains traits, configuration schemas,
//! typed identifiers, time-of-day and scheduling primitives, pagination
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ArenaHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
