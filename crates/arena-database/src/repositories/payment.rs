//! Payment record repository.

use sqlx::PgPool;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::{BookingId, PaymentId};
use arena_entity::payment::{CreatePayment, PaymentRecord};

/// Repository for payment records.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a payment record against a booking.
    pub async fn insert(
        &self,
        booking_id: BookingId,
        currency: &str,
        payment: &CreatePayment,
    ) -> AppResult<PaymentRecord> {
        sqlx::query_as::<_, PaymentRecord>(
            "INSERT INTO payments (id, booking_id, amount, currency, method, status, reference) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(PaymentId::new())
        .bind(booking_id)
        .bind(payment.amount)
        .bind(currency)
        .bind(&payment.method)
        .bind(payment.status)
        .bind(&payment.reference)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert payment", e))
    }

    /// All payment records for a booking, oldest first.
    pub async fn find_by_booking(&self, booking_id: BookingId) -> AppResult<Vec<PaymentRecord>> {
        sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE booking_id = $1 ORDER BY created_at",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list payments", e))
    }

    /// Sum of settled payments for a booking. Failed and refunded records
    /// never contribute.
    pub async fn sum_completed(&self, booking_id: BookingId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM payments \
             WHERE booking_id = $1 AND status = 'completed'",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum payments", e))
    }
}
