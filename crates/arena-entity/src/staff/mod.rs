//! Staff domain entities.

pub mod model;

pub use model::{AvailabilityEntry, Staff, StaffRole, StaffStatus};
