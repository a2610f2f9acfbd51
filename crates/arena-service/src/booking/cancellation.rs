//! Cancellation policy.
//!
//! A pure decision: given a booking, the acting role, and the current
//! instant, decide whether cancellation is permitted and what refund the
//! customer is owed. Applying the decision (status change, refund
//! record, history entry) is the booking service's job.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use arena_core::AppResult;
use arena_core::config::booking::BookingConfig;
use arena_entity::actor::ActorRole;
use arena_entity::booking::{Booking, BookingStatus, PaymentStatus};

/// Why a cancellation was denied.
#[derive(Debug, Clone, PartialEq)]
pub enum CancellationDenial {
    /// The booking is already in a terminal state.
    AlreadyTerminal(BookingStatus),
    /// An ordinary user is inside the cancellation cutoff window.
    WithinCutoff {
        /// Hours remaining until the booking starts.
        hours_remaining: f64,
        /// The configured cutoff in hours.
        cutoff_hours: i64,
    },
}

/// The outcome of evaluating a cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationDecision {
    /// Denial reason, `None` when the cancellation may proceed.
    pub denial: Option<CancellationDenial>,
    /// Refund owed in minor currency units. Zero unless the booking is
    /// paid and enough notice was given.
    pub refund_amount: i64,
    /// Hours between `now` and the booking's start instant (negative
    /// once the booking has started).
    pub hours_until_start: f64,
}

impl CancellationDecision {
    /// Whether the cancellation may proceed.
    pub fn allowed(&self) -> bool {
        self.denial.is_none()
    }
}

/// Evaluates cancellation requests.
#[derive(Debug, Clone)]
pub struct CancellationPolicy {
    /// Hours before start under which ordinary users may not cancel.
    user_cutoff_hours: i64,
    /// Notice required for a full refund.
    full_refund_hours: i64,
    /// Notice required for a half refund.
    half_refund_hours: i64,
}

impl CancellationPolicy {
    /// Creates a policy from booking configuration.
    pub fn new(config: &BookingConfig) -> Self {
        Self {
            user_cutoff_hours: config.user_cancellation_cutoff_hours,
            full_refund_hours: config.full_refund_hours,
            half_refund_hours: config.half_refund_hours,
        }
    }

    /// Evaluate a cancellation of `booking` by an actor with `role` at
    /// `now`, with deadlines computed in the facility's time zone.
    pub fn evaluate(
        &self,
        booking: &Booking,
        role: ActorRole,
        tz: Tz,
        now: DateTime<Utc>,
    ) -> AppResult<CancellationDecision> {
        let start = booking.start_instant(tz)?;
        let hours_until_start = (start - now).num_minutes() as f64 / 60.0;

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Ok(CancellationDecision {
                denial: Some(CancellationDenial::AlreadyTerminal(booking.status)),
                refund_amount: 0,
                hours_until_start,
            });
        }

        if hours_until_start < self.user_cutoff_hours as f64
            && !role.bypasses_cancellation_cutoff()
        {
            return Ok(CancellationDecision {
                denial: Some(CancellationDenial::WithinCutoff {
                    hours_remaining: hours_until_start,
                    cutoff_hours: self.user_cutoff_hours,
                }),
                refund_amount: 0,
                hours_until_start,
            });
        }

        let refund_amount = if booking.payment_status == PaymentStatus::Paid {
            if hours_until_start >= self.full_refund_hours as f64 {
                booking.pricing.total_amount
            } else if hours_until_start >= self.half_refund_hours as f64 {
                booking.pricing.total_amount / 2
            } else {
                0
            }
        } else {
            0
        };

        Ok(CancellationDecision {
            denial: None,
            refund_amount,
            hours_until_start,
        })
    }
}
