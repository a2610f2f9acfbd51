//! Staff matching against declared weekly availability.
//!
//! Eligibility requires an availability entry on the booking's weekday
//! that fully contains the requested window; partial overlap never
//! qualifies. Candidates keep roster declaration order and the first one
//! is the auto-assignment pick. The matcher itself does not know about
//! other bookings; the booking service filters out staff already
//! assigned on the same date.

use chrono::NaiveDate;

use arena_core::types::{DayOfWeek, TimeRange};
use arena_entity::staff::{Staff, StaffRole};

/// Matches staff to booking windows.
#[derive(Debug, Clone, Default)]
pub struct StaffMatcher;

impl StaffMatcher {
    /// Creates a matcher.
    pub fn new() -> Self {
        Self
    }

    /// Find roster members of `role` who can cover the whole window on
    /// `date`, in roster order.
    pub fn find_available<'a>(
        &self,
        roster: &'a [Staff],
        date: NaiveDate,
        range: &TimeRange,
        role: StaffRole,
    ) -> Vec<&'a Staff> {
        let day = DayOfWeek::of(date);
        roster
            .iter()
            .filter(|s| s.role == role && s.available_for(day, range))
            .collect()
    }

    /// The charge for assigning a staff member to a window:
    /// hours x hourly rate, rounded to the nearest currency unit.
    pub fn assignment_charge(&self, staff: &Staff, range: &TimeRange) -> i64 {
        (staff.hourly_rate * i64::from(range.duration_minutes()) + 30) / 60
    }
}
