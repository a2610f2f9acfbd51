//! Booking history repository.
//!
//! Append-only: this repository exposes no update or delete.

use sqlx::PgPool;
use sqlx::types::Json;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::{BookingId, HistoryEntryId};
use arena_entity::booking::{BookingHistoryEntry, CreateHistoryEntry};

/// Repository for booking history entries.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    /// Create a new history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one history entry.
    pub async fn append(&self, entry: &CreateHistoryEntry) -> AppResult<BookingHistoryEntry> {
        sqlx::query_as::<_, BookingHistoryEntry>(
            "INSERT INTO booking_history ( \
                id, booking_id, action, actor_id, actor_role, \
                before_state, after_state, notes \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(HistoryEntryId::new())
        .bind(entry.booking_id)
        .bind(&entry.action)
        .bind(entry.actor_id)
        .bind(entry.actor_role)
        .bind(entry.before_state.as_ref().map(Json))
        .bind(entry.after_state.as_ref().map(Json))
        .bind(&entry.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append history entry", e)
        })
    }

    /// A booking's full history in chronological order.
    pub async fn find_by_booking(
        &self,
        booking_id: BookingId,
    ) -> AppResult<Vec<BookingHistoryEntry>> {
        sqlx::query_as::<_, BookingHistoryEntry>(
            "SELECT * FROM booking_history WHERE booking_id = $1 ORDER BY created_at, id",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list history", e))
    }
}
