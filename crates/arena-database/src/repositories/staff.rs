//! Staff repository.

use sqlx::PgPool;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::{StadiumId, StaffId};
use arena_entity::staff::{Staff, StaffRole};

/// Repository for staff records.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    /// Create a new staff repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a staff member by ID.
    pub async fn find_by_id(&self, id: StaffId) -> AppResult<Option<Staff>> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find staff member", e))
    }

    /// A stadium's roster for one role, in stable roster order. The
    /// matcher's first-match rule depends on this ordering staying
    /// deterministic across calls.
    pub async fn find_by_stadium_role(
        &self,
        stadium_id: StadiumId,
        role: StaffRole,
    ) -> AppResult<Vec<Staff>> {
        sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE stadium_id = $1 AND role = $2 \
             ORDER BY created_at, id",
        )
        .bind(stadium_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list staff roster", e))
    }
}
