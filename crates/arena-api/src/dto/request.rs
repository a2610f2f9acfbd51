//! Request DTOs with validation.
//!
//! Booking creation deserializes straight into the domain request sum
//! type; the DTOs here cover the narrower mutation endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use arena_core::types::TimeOfDay;
use arena_entity::payment::PaymentRecordStatus;
use arena_entity::staff::StaffRole;

/// Cancel booking request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// Free-text cancellation reason.
    pub reason: Option<String>,
}

/// Reschedule request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    /// New calendar date.
    pub booking_date: NaiveDate,
    /// New window start (inclusive).
    pub start_time: TimeOfDay,
    /// New window end (exclusive).
    pub end_time: TimeOfDay,
}

/// Record payment request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    /// Amount settled, in minor currency units.
    #[validate(range(min = 1, message = "Payment amount must be positive"))]
    pub amount: i64,
    /// Payment method (e.g. `"card"`, `"cash"`).
    #[validate(length(min = 1, max = 50))]
    pub method: String,
    /// Settlement status; defaults to `completed`.
    pub status: Option<PaymentRecordStatus>,
    /// External payment reference.
    pub reference: Option<String>,
}

/// Apply discount request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyDiscountRequest {
    /// Discount code, the idempotency key.
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// Amount deducted, in minor currency units.
    #[validate(range(min = 0))]
    pub amount: i64,
    /// Optional note recorded with the discount.
    pub note: Option<String>,
}

/// Staff assignment request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignStaffRequest {
    /// Role to assign.
    pub role: StaffRole,
}

/// Availability check query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityCheckQuery {
    /// Date to check.
    pub date: NaiveDate,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
}

/// Availability calendar query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityDayQuery {
    /// Date to describe.
    pub date: NaiveDate,
}
