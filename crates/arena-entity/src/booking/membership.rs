//! Membership series metadata carried by recurring bookings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use arena_core::types::{DayOfWeek, MembershipId};

/// Recurrence pattern of a membership series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    /// Every 7 days.
    Weekly,
    /// Every 14 days.
    Biweekly,
    /// One calendar month, preserving the nth-weekday-of-month position.
    Monthly,
}

impl RecurrencePattern {
    /// Return the pattern as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata attached to each occurrence of a membership series.
///
/// The counters reflect only the persisted subset of the requested
/// series; occurrences that failed availability never count. Each
/// occurrence keeps its own independent booking status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipInfo {
    /// Identifier shared by every occurrence of this series.
    pub membership_id: MembershipId,
    /// Recurrence pattern.
    pub pattern: RecurrencePattern,
    /// Day of the week each occurrence falls on.
    pub day_of_week: DayOfWeek,
    /// Number of occurrences actually persisted.
    pub total_occurrences: u32,
    /// Occurrences that have completed.
    pub completed_occurrences: u32,
    /// Next occurrence date still in the future at creation time.
    pub next_booking_date: Option<NaiveDate>,
    /// Whether the series is still active.
    pub is_active: bool,
}
