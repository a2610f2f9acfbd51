//! Repository implementations, one per aggregate.

pub mod booking;
pub mod field;
pub mod history;
pub mod payment;
pub mod stadium;
pub mod staff;

use arena_core::error::{AppError, ErrorKind};

/// SQLSTATE for exclusion-constraint violations.
const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Translate a write error, surfacing lost slot races as
/// [`ErrorKind::SlotConflict`].
///
/// The exclusion constraint on `bookings` is the atomicity authority for
/// the no-overlap invariant; any insert or update that loses the race
/// arrives here as SQLSTATE 23P01.
pub(crate) fn map_booking_write_error(err: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(EXCLUSION_VIOLATION) => {
                return AppError::new(
                    ErrorKind::SlotConflict,
                    "The requested slot was reserved by a concurrent booking",
                );
            }
            Some(UNIQUE_VIOLATION) => {
                return AppError::new(
                    ErrorKind::SlotConflict,
                    "A booking with the same reservation key already exists",
                );
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}
