//! Application builder — wires repositories, services, the scheduler,
//! and the router into a running server.

use std::sync::Arc;

use sqlx::PgPool;

use arena_cache::provider::CacheManager;
use arena_core::config::AppConfig;
use arena_core::error::AppError;
use arena_database::repositories::booking::BookingRepository;
use arena_database::repositories::field::FieldRepository;
use arena_database::repositories::history::HistoryRepository;
use arena_database::repositories::payment::PaymentRepository;
use arena_database::repositories::stadium::StadiumRepository;
use arena_database::repositories::staff::StaffRepository;
use arena_service::{AvailabilityChecker, BookingService};
use arena_worker::SweepScheduler;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the ArenaHub server with the given configuration and pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting ArenaHub server...");

    // ── Step 1: Initialize cache ─────────────────────────────────
    tracing::info!(
        "Initializing cache (provider: {})...",
        config.cache.provider
    );
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 2: Initialize repositories ──────────────────────────
    let booking_repo = Arc::new(BookingRepository::new(db_pool.clone()));
    let field_repo = Arc::new(FieldRepository::new(db_pool.clone()));
    let stadium_repo = Arc::new(StadiumRepository::new(db_pool.clone()));
    let staff_repo = Arc::new(StaffRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(db_pool.clone()));
    let history_repo = Arc::new(HistoryRepository::new(db_pool.clone()));

    // ── Step 3: Initialize services ──────────────────────────────
    let availability = Arc::new(AvailabilityChecker::new(
        Arc::clone(&booking_repo),
        Arc::clone(&cache),
        &config.booking,
    ));
    let booking_service = Arc::new(BookingService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&field_repo),
        Arc::clone(&stadium_repo),
        Arc::clone(&staff_repo),
        Arc::clone(&payment_repo),
        Arc::clone(&history_repo),
        Arc::clone(&availability),
        &config.booking,
    ));

    // ── Step 4: Start the sweep scheduler ────────────────────────
    let mut scheduler = SweepScheduler::new(Arc::clone(&booking_service), config.worker.clone())
        .await?;
    scheduler.start().await?;

    // ── Step 5: Build and start the HTTP server ──────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        cache,
        field_repo,
        stadium_repo,
        availability,
        booking_service,
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ArenaHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
