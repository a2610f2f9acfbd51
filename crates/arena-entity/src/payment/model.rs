//! Payment record entity model.
//!
//! Gateway integration lives outside this system; payment records arrive
//! already settled and the engine only derives booking-level payment
//! status from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use arena_core::types::{BookingId, PaymentId};

/// Settlement state of one payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_record_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentRecordStatus {
    /// Initiated but not settled.
    Pending,
    /// Settled; counts toward the booking total.
    Completed,
    /// Declined or errored; never counts.
    Failed,
    /// Returned to the customer; never counts.
    Refunded,
}

impl PaymentRecordStatus {
    /// Whether the record contributes to the paid sum.
    pub fn counts_toward_total(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One payment attempt against a booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRecord {
    /// Unique payment identifier.
    pub id: PaymentId,
    /// The booking being paid.
    pub booking_id: BookingId,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Payment method label (e.g. `"card"`, `"bank_transfer"`, `"cash"`).
    pub method: String,
    /// Settlement state.
    pub status: PaymentRecordStatus,
    /// External gateway reference.
    pub reference: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    /// Amount in minor currency units.
    pub amount: i64,
    /// Payment method label.
    pub method: String,
    /// Settlement state reported by the gateway.
    pub status: PaymentRecordStatus,
    /// External gateway reference.
    pub reference: Option<String>,
}
