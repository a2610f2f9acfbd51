//! Booking engine configuration.

use serde::{Deserialize, Serialize};

/// Settings governing the scheduling and cancellation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Hours before the start time under which ordinary users may no
    /// longer cancel.
    #[serde(default = "default_user_cancellation_cutoff")]
    pub user_cancellation_cutoff_hours: i64,
    /// Notice (hours) required for a full refund.
    #[serde(default = "default_full_refund")]
    pub full_refund_hours: i64,
    /// Notice (hours) required for a half refund.
    #[serde(default = "default_half_refund")]
    pub half_refund_hours: i64,
    /// Sub-increment in minutes used when integrating a rate over a
    /// booking window. Pricing tiers may change mid-booking.
    #[serde(default = "default_pricing_increment")]
    pub pricing_increment_minutes: u16,
    /// TTL in seconds for cached availability results. Staleness is
    /// bounded by this value; correctness never depends on it.
    #[serde(default = "default_availability_ttl")]
    pub availability_cache_ttl_seconds: u64,
    /// Hours a `pending` booking may remain unpaid before the expiry
    /// sweep cancels it. Zero disables the sweep.
    #[serde(default = "default_pending_hold")]
    pub pending_payment_hold_hours: i64,
    /// Upper bound on occurrences a single membership request may expand
    /// into.
    #[serde(default = "default_max_occurrences")]
    pub max_series_occurrences: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            user_cancellation_cutoff_hours: default_user_cancellation_cutoff(),
            full_refund_hours: default_full_refund(),
            half_refund_hours: default_half_refund(),
            pricing_increment_minutes: default_pricing_increment(),
            availability_cache_ttl_seconds: default_availability_ttl(),
            pending_payment_hold_hours: default_pending_hold(),
            max_series_occurrences: default_max_occurrences(),
        }
    }
}

fn default_user_cancellation_cutoff() -> i64 {
    24
}

fn default_full_refund() -> i64 {
    48
}

fn default_half_refund() -> i64 {
    24
}

fn default_pricing_increment() -> u16 {
    30
}

fn default_availability_ttl() -> u64 {
    60
}

fn default_pending_hold() -> i64 {
    12
}

fn default_max_occurrences() -> u32 {
    104
}
