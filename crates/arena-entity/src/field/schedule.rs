//! Weekly schedule and special-date override value objects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use arena_core::types::{DayOfWeek, TimeOfDay, TimeRange};

/// One declared slot in a day's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Slot start (inclusive).
    pub start_time: TimeOfDay,
    /// Slot end (exclusive).
    pub end_time: TimeOfDay,
    /// Whether the slot is open for booking at all.
    pub is_available: bool,
    /// Optional display rate for this slot, shown on calendars. Pricing
    /// resolution goes through tiers and seasonal rates, not this field.
    pub special_rate: Option<i64>,
}

impl ScheduleSlot {
    /// The slot's half-open time window.
    pub fn window(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// The declared slots for one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Day of the week this entry describes.
    pub day_of_week: DayOfWeek,
    /// Declared slots, in declaration order.
    pub slots: Vec<ScheduleSlot>,
}

/// A calendar-date override that replaces the weekly schedule entirely
/// for that date (holiday closures, special events).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDate {
    /// The date being overridden.
    pub date: NaiveDate,
    /// Replacement slots. Empty means closed all day.
    pub slots: Vec<ScheduleSlot>,
    /// Optional human-readable reason.
    pub reason: Option<String>,
}
