//! Stadium repository.

use sqlx::PgPool;

use arena_core::error::{AppError, ErrorKind};
use arena_core::result::AppResult;
use arena_core::types::StadiumId;
use arena_entity::stadium::Stadium;

/// Repository for stadium records.
#[derive(Debug, Clone)]
pub struct StadiumRepository {
    pool: PgPool,
}

impl StadiumRepository {
    /// Create a new stadium repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a stadium by ID.
    pub async fn find_by_id(&self, id: StadiumId) -> AppResult<Option<Stadium>> {
        sqlx::query_as::<_, Stadium>("SELECT * FROM stadiums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find stadium", e))
    }

    /// Find a stadium by ID, or fail with not-found.
    pub async fn get(&self, id: StadiumId) -> AppResult<Stadium> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Stadium {id} not found")))
    }
}
