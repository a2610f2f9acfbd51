//! # arena-api
//!
//! HTTP API layer for ArenaHub built on Axum.
//!
//! Provides the REST endpoints for bookings and availability, the actor
//! identity extractor, DTOs, and error mapping. Authentication happens
//! upstream at the gateway; this layer only reads the forwarded actor
//! identity headers.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use state::AppState;
