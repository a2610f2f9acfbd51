//! Booking repository.
//!
//! All writes that (re)occupy a slot go through single statements guarded
//! by the `bookings_no_overlap` exclusion constraint. The availability
//! check performed beforehand is advisory; the constraint is what makes
//! reservation atomic under concurrency.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::{BookingId, FieldId, MembershipId, PageRequest, StadiumId, TimeRange, UserId};
use arena_entity::booking::Booking;

use super::map_booking_write_error;

/// Repository for booking records.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Find a booking by ID, or fail with not-found.
    pub async fn get(&self, id: BookingId) -> AppResult<Booking> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    /// Find live (pending/confirmed) bookings overlapping a half-open
    /// window on a field/date, optionally excluding one booking (used by
    /// reschedule to ignore the booking's own reservation).
    pub async fn find_overlapping(
        &self,
        field_id: FieldId,
        date: NaiveDate,
        range: TimeRange,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE field_id = $1 AND booking_date = $2 \
               AND status IN ('pending', 'confirmed') \
               AND start_time < $4 AND end_time > $3 \
               AND ($5::uuid IS NULL OR id != $5) \
             ORDER BY start_time",
        )
        .bind(field_id)
        .bind(date)
        .bind(range.start)
        .bind(range.end)
        .bind(exclude.map(BookingId::into_uuid))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find overlapping bookings", e)
        })
    }

    /// All live bookings for a field on a date, ordered by start time.
    pub async fn find_live_by_field_date(
        &self,
        field_id: FieldId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE field_id = $1 AND booking_date = $2 \
               AND status IN ('pending', 'confirmed') \
             ORDER BY start_time",
        )
        .bind(field_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list field bookings", e)
        })
    }

    /// All live bookings across a stadium on a date. Used to detect staff
    /// already assigned elsewhere.
    pub async fn find_live_by_stadium_date(
        &self,
        stadium_id: StadiumId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE stadium_id = $1 AND booking_date = $2 \
               AND status IN ('pending', 'confirmed') \
             ORDER BY start_time",
        )
        .bind(stadium_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list stadium bookings", e)
        })
    }

    /// Atomically insert a booking, reserving its slot.
    ///
    /// A lost race against a concurrent reservation surfaces as
    /// `SlotConflict`, not as a database error.
    pub async fn insert_reserving_slot(&self, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings ( \
                id, booking_number, user_id, stadium_id, field_id, booking_date, \
                start_time, end_time, duration_hours, status, payment_status, \
                booking_type, pricing, membership, assigned_staff, cancellation, \
                team_name, special_requests, created_at, updated_at \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                       $14, $15, $16, $17, $18, $19, $20) \
             RETURNING *",
        )
        .bind(booking.id)
        .bind(&booking.booking_number)
        .bind(booking.user_id)
        .bind(booking.stadium_id)
        .bind(booking.field_id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.duration_hours)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(booking.booking_type)
        .bind(Json(&booking.pricing))
        .bind(booking.membership.as_ref().map(Json))
        .bind(Json(&booking.assigned_staff))
        .bind(booking.cancellation.as_ref().map(Json))
        .bind(&booking.team_name)
        .bind(&booking.special_requests)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_booking_write_error(e, "Failed to insert booking"))
    }

    /// Persist a state transition: status, payment status, pricing,
    /// membership counters, staff list, and cancellation record.
    pub async fn update_transition(&self, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET \
                status = $2, payment_status = $3, pricing = $4, membership = $5, \
                assigned_staff = $6, cancellation = $7, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(Json(&booking.pricing))
        .bind(booking.membership.as_ref().map(Json))
        .bind(Json(&booking.assigned_staff))
        .bind(booking.cancellation.as_ref().map(Json))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_booking_write_error(e, "Failed to update booking"))
    }

    /// Move a booking to a new slot in place, preserving its identity and
    /// history. The new window, its repriced breakdown, and the derived
    /// payment status land in one statement, so a failure leaves the row
    /// entirely unchanged. The exclusion constraint re-validates
    /// non-overlap inside that same statement; losing the race is a
    /// `SlotConflict`.
    pub async fn reschedule(&self, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET \
                booking_date = $2, start_time = $3, end_time = $4, \
                duration_hours = $5, pricing = $6, payment_status = $7, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.duration_hours)
        .bind(Json(&booking.pricing))
        .bind(booking.payment_status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_booking_write_error(e, "Failed to reschedule booking"))
    }

    /// Live bookings on or before a date, candidates for the
    /// elapsed-booking sweep. The caller applies the precise
    /// facility-local elapse check.
    pub async fn find_sweep_candidates(&self, on_or_before: NaiveDate) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE status IN ('pending', 'confirmed') AND booking_date <= $1 \
             ORDER BY booking_date, start_time",
        )
        .bind(on_or_before)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list sweep candidates", e)
        })
    }

    /// Pending, unpaid bookings created before the cutoff; candidates for
    /// the payment-expiry sweep.
    pub async fn find_expired_pending(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE status = 'pending' AND payment_status = 'pending' \
               AND created_at < $1 \
             ORDER BY created_at",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list expired bookings", e)
        })
    }

    /// A user's bookings, newest first, paginated.
    pub async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 \
             ORDER BY booking_date DESC, start_time DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user bookings", e))
    }

    /// Count a user's bookings.
    pub async fn count_by_user(&self, user_id: UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count user bookings", e)
            })?;
        Ok(count as u64)
    }

    /// All occurrences belonging to one membership series, in date order.
    pub async fn find_by_membership(
        &self,
        membership_id: MembershipId,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE membership->>'membership_id' = $1 \
             ORDER BY booking_date",
        )
        .bind(membership_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list membership bookings", e)
        })
    }
}
