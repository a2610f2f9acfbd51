//! Field repository.

use sqlx::PgPool;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::{FieldId, StadiumId};
use arena_entity::field::Field;

/// Repository for field records.
#[derive(Debug, Clone)]
pub struct FieldRepository {
    pool: PgPool,
}

impl FieldRepository {
    /// Create a new field repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a field by ID.
    pub async fn find_by_id(&self, id: FieldId) -> AppResult<Option<Field>> {
        sqlx::query_as::<_, Field>("SELECT * FROM fields WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find field", e))
    }

    /// Find a field by ID, or fail with not-found.
    pub async fn get(&self, id: FieldId) -> AppResult<Field> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Field {id} not found")))
    }

    /// All fields of a stadium, in creation order.
    pub async fn find_by_stadium(&self, stadium_id: StadiumId) -> AppResult<Vec<Field>> {
        sqlx::query_as::<_, Field>(
            "SELECT * FROM fields WHERE stadium_id = $1 ORDER BY created_at, id",
        )
        .bind(stadium_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list fields", e))
    }
}
