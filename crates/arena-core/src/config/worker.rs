//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduler settings for periodic engine sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background scheduler runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cron expression for the elapsed-booking sweep.
    #[serde(default = "default_sweep_schedule")]
    pub booking_sweep_schedule: String,
    /// Cron expression for the pending-payment expiry sweep.
    #[serde(default = "default_expiry_schedule")]
    pub payment_expiry_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            booking_sweep_schedule: default_sweep_schedule(),
            payment_expiry_schedule: default_expiry_schedule(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    // Every 5 minutes.
    "0 */5 * * * *".to_string()
}

fn default_expiry_schedule() -> String {
    // Every 15 minutes.
    "0 */15 * * * *".to_string()
}
