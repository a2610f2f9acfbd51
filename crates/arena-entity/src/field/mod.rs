//! Field domain entities: the bookable resource with its pricing and
//! schedule configuration.

pub mod model;
pub mod pricing;
pub mod schedule;

pub use model::Field;
pub use pricing::{PricingTier, SeasonalRate};
pub use schedule::{DaySchedule, ScheduleSlot, SpecialDate};
