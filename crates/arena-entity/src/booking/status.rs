//! Booking status, payment status, and booking category enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a booking.
///
/// Transitions: `pending -> confirmed -> completed`; `cancelled` is
/// reachable from `pending` or `confirmed`; `no_show` from `confirmed`
/// after the slot has elapsed. `cancelled`, `completed`, and `no_show`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting confirmation or payment.
    Pending,
    /// Confirmed; the slot is committed.
    Confirmed,
    /// Cancelled by an actor or a sweep.
    Cancelled,
    /// The slot elapsed normally.
    Completed,
    /// Confirmed but the customer never showed up.
    NoShow,
}

impl BookingStatus {
    /// Whether the booking occupies its slot for conflict purposes.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::NoShow)
    }

    /// Whether the state machine permits moving to `next`.
    ///
    /// `pending -> completed` covers the elapsed-booking sweep: a booking
    /// whose slot has passed without ever being confirmed is closed out
    /// rather than left live.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Pending, Self::Completed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::NoShow)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking-level payment state, derived from the booking's payment
/// records. Never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Completed payments do not yet cover the total.
    Pending,
    /// Completed payments cover the total.
    Paid,
    /// The most recent attempt failed and nothing is paid.
    Failed,
    /// A refund was issued on cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    /// One-off reservation.
    Regular,
    /// Tournament fixture.
    Tournament,
    /// Training session.
    Training,
    /// Other organized event.
    Event,
    /// One occurrence of a recurring membership series.
    Membership,
}

impl BookingType {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Tournament => "tournament",
            Self::Training => "training",
            Self::Event => "event",
            Self::Membership => "membership",
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
