//! Shared domain primitive types.

pub mod id;
pub mod pagination;
pub mod time;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use time::{DayOfWeek, TimeOfDay, TimeRange};
