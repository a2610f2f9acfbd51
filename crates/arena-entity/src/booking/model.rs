//! Booking entity model.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arena_core::AppError;
use arena_core::types::{BookingId, FieldId, StadiumId, StaffId, TimeOfDay, TimeRange, UserId};

use crate::actor::ActorRole;
use crate::staff::StaffRole;

use super::membership::MembershipInfo;
use super::pricing::PricingBreakdown;
use super::status::{BookingStatus, BookingType, PaymentStatus};

/// A staff member attached to a booking with their computed charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedStaff {
    /// The assigned staff member.
    pub staff_id: StaffId,
    /// Name at assignment time.
    pub name: String,
    /// Role at assignment time.
    pub role: StaffRole,
    /// Charge for the booking window: hours x hourly rate.
    pub charge: i64,
}

/// Record of a booking's cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// Who cancelled.
    pub cancelled_by: Option<UserId>,
    /// The cancelling actor's role.
    pub actor_role: ActorRole,
    /// Free-text reason supplied by the actor.
    pub reason: Option<String>,
    /// Refund issued, in minor currency units.
    pub refund_amount: i64,
    /// When the cancellation happened.
    pub cancelled_at: DateTime<Utc>,
}

/// The central reservation record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Human-readable unique reference (`BK-YYYYMMDD-XXXXXX`).
    pub booking_number: String,
    /// The customer who owns the reservation.
    pub user_id: UserId,
    /// The stadium the field belongs to.
    pub stadium_id: StadiumId,
    /// The booked field.
    pub field_id: FieldId,
    /// Calendar date of the reservation.
    pub booking_date: NaiveDate,
    /// Start of the reserved window (inclusive).
    pub start_time: TimeOfDay,
    /// End of the reserved window (exclusive).
    pub end_time: TimeOfDay,
    /// Duration in fractional hours, derived from the window.
    pub duration_hours: f64,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Derived payment state.
    pub payment_status: PaymentStatus,
    /// Booking category.
    pub booking_type: BookingType,
    /// Monetary breakdown.
    #[sqlx(json)]
    pub pricing: PricingBreakdown,
    /// Membership series metadata, present on membership occurrences.
    #[sqlx(json(nullable))]
    pub membership: Option<MembershipInfo>,
    /// Staff attached to the booking.
    #[sqlx(json)]
    pub assigned_staff: Vec<AssignedStaff>,
    /// Cancellation record, set when cancelled.
    #[sqlx(json(nullable))]
    pub cancellation: Option<CancellationRecord>,
    /// Team name supplied with the request.
    pub team_name: Option<String>,
    /// Free-text special requests.
    pub special_requests: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The reserved half-open time window.
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// The booking's start instant in the facility's local time zone,
    /// expressed in UTC.
    pub fn start_instant(&self, tz: Tz) -> Result<DateTime<Utc>, AppError> {
        local_instant(self.booking_date, self.start_time, tz)
    }

    /// The booking's end instant in the facility's local time zone,
    /// expressed in UTC.
    pub fn end_instant(&self, tz: Tz) -> Result<DateTime<Utc>, AppError> {
        local_instant(self.booking_date, self.end_time, tz)
    }

    /// Whether the reserved window has fully elapsed at `now`.
    pub fn has_elapsed(&self, tz: Tz, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self.end_instant(tz)? <= now)
    }
}

/// Resolve a facility-local date + time-of-day to a UTC instant.
///
/// An ambiguous local time (DST fold) resolves to the earlier instant; a
/// skipped local time is a validation error.
pub fn local_instant(date: NaiveDate, time: TimeOfDay, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    use chrono::TimeZone;

    // 24:00 rolls over to midnight of the next day.
    let (date, minutes) = if time.minutes() == 1440 {
        (
            date.succ_opt().ok_or_else(|| {
                AppError::validation(format!("Date out of range after {date}"))
            })?,
            0,
        )
    } else {
        (date, time.minutes())
    };
    let naive = date
        .and_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .ok_or_else(|| AppError::validation(format!("Invalid time of day: {time}")))?;
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        chrono::LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        chrono::LocalResult::None => Err(AppError::validation(format!(
            "Local time {naive} does not exist in zone {tz}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::pricing::PricingBreakdown;

    fn booking(date: NaiveDate, start: &str, end: &str) -> Booking {
        let start: TimeOfDay = start.parse().unwrap();
        let end: TimeOfDay = end.parse().unwrap();
        Booking {
            id: BookingId::new(),
            booking_number: "BK-20251201-A1B2C3".to_string(),
            user_id: UserId::new(),
            stadium_id: StadiumId::new(),
            field_id: FieldId::new(),
            booking_date: date,
            start_time: start,
            end_time: end,
            duration_hours: TimeRange { start, end }.duration_hours(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            booking_type: BookingType::Regular,
            pricing: PricingBreakdown::new(200_000, 100_000, None, "VND"),
            membership: None,
            assigned_staff: Vec::new(),
            cancellation: None,
            team_name: None,
            special_requests: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_start_instant_respects_zone() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let b = booking(date, "09:00", "11:00");
        // UTC+7: 09:00 local is 02:00 UTC.
        let instant = b.start_instant(chrono_tz::Asia::Ho_Chi_Minh).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-12-01T02:00:00+00:00");
    }

    #[test]
    fn test_has_elapsed() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let b = booking(date, "09:00", "11:00");
        let tz = chrono_tz::UTC;
        let before = "2025-12-01T10:59:00Z".parse::<DateTime<Utc>>().unwrap();
        let after = "2025-12-01T11:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(!b.has_elapsed(tz, before).unwrap());
        assert!(b.has_elapsed(tz, after).unwrap());
    }

    #[test]
    fn test_midnight_end_rolls_over() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let end: TimeOfDay = "24:00".parse().unwrap();
        let instant = local_instant(date, end, chrono_tz::UTC).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-12-02T00:00:00+00:00");
    }
}
