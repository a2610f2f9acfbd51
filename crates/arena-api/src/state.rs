//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use arena_cache::provider::CacheManager;
use arena_core::config::AppConfig;
use arena_database::repositories::field::FieldRepository;
use arena_database::repositories::stadium::StadiumRepository;
use arena_service::{AvailabilityChecker, BookingService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory).
    pub cache: Arc<CacheManager>,
    /// Field repository, for availability lookups.
    pub field_repo: Arc<FieldRepository>,
    /// Stadium repository.
    pub stadium_repo: Arc<StadiumRepository>,
    /// Availability checker.
    pub availability: Arc<AvailabilityChecker>,
    /// Booking lifecycle service.
    pub booking_service: Arc<BookingService>,
}
