//! Staff entity model and enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use arena_core::types::{DayOfWeek, StadiumId, StaffId, TimeOfDay, TimeRange};

/// Role of a staff member. Only referees participate in auto-assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Match referee, auto-assignable to bookings.
    Referee,
    /// Facility manager.
    Manager,
    /// Grounds and equipment maintenance.
    Maintenance,
    /// Site security.
    Security,
}

impl StaffRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Referee => "referee",
            Self::Manager => "manager",
            Self::Maintenance => "maintenance",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    /// Eligible for assignment.
    Active,
    /// Not currently working.
    Inactive,
    /// Temporarily barred from assignment.
    Suspended,
}

/// One declared weekly availability window for a staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    /// Day of the week.
    pub day_of_week: DayOfWeek,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
    /// Whether the member is actually available in this window.
    pub is_available: bool,
}

impl AvailabilityEntry {
    /// The entry's half-open time window.
    pub fn window(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether this entry makes the member available for the whole of
    /// `range` on `day`. Partial overlap does not count.
    pub fn covers(&self, day: DayOfWeek, range: &TimeRange) -> bool {
        self.is_available && self.day_of_week == day && self.window().contains_range(range)
    }
}

/// A staff member belonging to a stadium.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Employing stadium.
    pub stadium_id: StadiumId,
    /// Full name.
    pub name: String,
    /// Staff role.
    pub role: StaffRole,
    /// Hourly rate in minor currency units, charged to bookings on
    /// assignment.
    pub hourly_rate: i64,
    /// Employment status.
    pub status: StaffStatus,
    /// Declared weekly availability, in declaration order.
    #[sqlx(json)]
    pub availability: Vec<AvailabilityEntry>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    /// Whether this member can cover `range` on `day` at all.
    pub fn available_for(&self, day: DayOfWeek, range: &TimeRange) -> bool {
        self.status == StaffStatus::Active
            && self.availability.iter().any(|a| a.covers(day, range))
    }
}
