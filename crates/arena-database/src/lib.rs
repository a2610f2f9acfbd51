//! # arena-database
//!
//! PostgreSQL persistence for ArenaHub: connection pool management,
//! migrations, and repositories. The bookings table carries the
//! exclusion constraint that makes slot reservation atomic; see
//! [`repositories::booking`].

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
