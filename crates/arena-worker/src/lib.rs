//! Scheduled booking sweeps for ArenaHub.
//!
//! This crate provides a cron scheduler that periodically invokes the
//! booking engine's maintenance sweeps: completing elapsed bookings and
//! expiring pending bookings whose payment hold has lapsed.

pub mod scheduler;

pub use scheduler::SweepScheduler;
