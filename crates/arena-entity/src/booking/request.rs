//! Booking request shapes.
//!
//! Creation accepts one of two mutually exclusive shapes through a single
//! entry point. The discrimination happens once, at the boundary, by
//! deserializing into the [`BookingRequest`] sum type; services never
//! inspect optional fields to guess the intent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use arena_core::AppError;
use arena_core::types::{DayOfWeek, FieldId, StadiumId, TimeOfDay, TimeRange};

use super::membership::RecurrencePattern;
use super::status::BookingType;

/// A one-off reservation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularBookingRequest {
    /// Target stadium.
    pub stadium_id: StadiumId,
    /// Target field.
    pub field_id: FieldId,
    /// Calendar date.
    pub booking_date: NaiveDate,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
    /// Booking category; defaults to `regular`.
    pub booking_type: Option<BookingType>,
    /// Team name.
    pub team_name: Option<String>,
    /// Free-text special requests.
    pub special_requests: Option<String>,
}

impl RegularBookingRequest {
    /// Validate the request and return its time window.
    pub fn validate(&self) -> Result<TimeRange, AppError> {
        if self.booking_type == Some(BookingType::Membership) {
            return Err(AppError::validation(
                "Membership bookings must use the membership request shape",
            ));
        }
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// A recurring membership request, expanded into a series of occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipBookingRequest {
    /// Target stadium.
    pub stadium_id: StadiumId,
    /// Target field.
    pub field_id: FieldId,
    /// Earliest date an occurrence may fall on.
    pub start_date: NaiveDate,
    /// Last permitted occurrence date. Exactly one of `end_date` and
    /// `total_occurrences` must be given.
    pub end_date: Option<NaiveDate>,
    /// Day of the week each occurrence falls on.
    pub day_of_week: DayOfWeek,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
    /// Recurrence pattern.
    pub recurrence_pattern: RecurrencePattern,
    /// Requested occurrence count.
    pub total_occurrences: Option<u32>,
    /// Team name.
    pub team_name: Option<String>,
}

impl MembershipBookingRequest {
    /// Validate the request and return its time window.
    pub fn validate(&self) -> Result<TimeRange, AppError> {
        match (self.end_date, self.total_occurrences) {
            (Some(_), Some(_)) => {
                return Err(AppError::validation(
                    "Specify either end_date or total_occurrences, not both",
                ));
            }
            (None, None) => {
                return Err(AppError::validation(
                    "A membership request needs an end_date or a total_occurrences count",
                ));
            }
            (Some(end), None) if end < self.start_date => {
                return Err(AppError::validation(format!(
                    "end_date {} is before start_date {}",
                    end, self.start_date
                )));
            }
            (None, Some(0)) => {
                return Err(AppError::validation("total_occurrences must be positive"));
            }
            _ => {}
        }
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// A booking creation request: either a single reservation or a
/// membership series.
///
/// Deserialization tries the membership shape first; its mandatory
/// recurrence fields make the two shapes unambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingRequest {
    /// Recurring membership series.
    Membership(MembershipBookingRequest),
    /// One-off reservation.
    Regular(RegularBookingRequest),
}

impl BookingRequest {
    /// The target field, common to both shapes.
    pub fn field_id(&self) -> FieldId {
        match self {
            Self::Membership(r) => r.field_id,
            Self::Regular(r) => r.field_id,
        }
    }

    /// The target stadium, common to both shapes.
    pub fn stadium_id(&self) -> StadiumId {
        match self {
            Self::Membership(r) => r.stadium_id,
            Self::Regular(r) => r.stadium_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership_json() -> serde_json::Value {
        serde_json::json!({
            "stadium_id": uuid::Uuid::new_v4(),
            "field_id": uuid::Uuid::new_v4(),
            "start_date": "2025-12-01",
            "day_of_week": 3,
            "start_time": "19:00",
            "end_time": "21:00",
            "recurrence_pattern": "weekly",
            "total_occurrences": 26
        })
    }

    #[test]
    fn test_discriminates_membership_shape() {
        let req: BookingRequest = serde_json::from_value(membership_json()).unwrap();
        assert!(matches!(req, BookingRequest::Membership(_)));
    }

    #[test]
    fn test_discriminates_regular_shape() {
        let json = serde_json::json!({
            "stadium_id": uuid::Uuid::new_v4(),
            "field_id": uuid::Uuid::new_v4(),
            "booking_date": "2025-12-01",
            "start_time": "09:00",
            "end_time": "11:00"
        });
        let req: BookingRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(req, BookingRequest::Regular(_)));
    }

    #[test]
    fn test_membership_requires_exactly_one_termination() {
        let mut both = membership_json();
        both["end_date"] = serde_json::json!("2026-06-01");
        let req: MembershipBookingRequest = serde_json::from_value(both).unwrap();
        assert!(req.validate().is_err());

        let mut neither = membership_json();
        neither
            .as_object_mut()
            .unwrap()
            .remove("total_occurrences");
        let req: MembershipBookingRequest = serde_json::from_value(neither).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_membership_rejects_inverted_window() {
        let mut json = membership_json();
        json["start_time"] = serde_json::json!("21:00");
        json["end_time"] = serde_json::json!("19:00");
        let req: MembershipBookingRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());
    }
}
