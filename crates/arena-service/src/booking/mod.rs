//! Booking lifecycle: creation, series expansion, cancellation,
//! reschedule, payments, and the scheduled sweeps.

pub mod cancellation;
pub mod series;
pub mod service;

pub use cancellation::{CancellationDecision, CancellationDenial, CancellationPolicy};
pub use series::SeriesGenerator;
pub use service::{
    BookingOutcome, BookingService, CancellationOutcome, OccurrenceFailure, SeriesOutcome,
};
