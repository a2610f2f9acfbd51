//! Route definitions for the ArenaHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(booking_routes())
        .merge(availability_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Booking lifecycle endpoints.
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings", get(handlers::booking::list_bookings))
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/{id}/history",
            get(handlers::booking::booking_history),
        )
        .route(
            "/bookings/{id}/confirm",
            post(handlers::booking::confirm_booking),
        )
        .route(
            "/bookings/{id}/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/bookings/{id}/schedule",
            put(handlers::booking::reschedule_booking),
        )
        .route(
            "/bookings/{id}/no-show",
            post(handlers::booking::mark_no_show),
        )
        .route(
            "/bookings/{id}/payments",
            post(handlers::booking::record_payment),
        )
        .route(
            "/bookings/{id}/discounts",
            post(handlers::booking::apply_discount),
        )
        .route(
            "/bookings/{id}/staff",
            post(handlers::booking::assign_staff),
        )
}

/// Availability read endpoints.
fn availability_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/fields/{id}/availability",
            get(handlers::availability::day_availability),
        )
        .route(
            "/fields/{id}/availability/check",
            get(handlers::availability::check_slot),
        )
}

/// Health check endpoints (no actor identity required).
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}
