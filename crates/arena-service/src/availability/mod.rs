//! Slot availability checking.

pub mod checker;

pub use checker::{AvailabilityChecker, DayAvailability, SlotState, SlotView};
