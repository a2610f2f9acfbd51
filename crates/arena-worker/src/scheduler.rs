//! Cron scheduler for the periodic booking sweeps.
//!
//! Both sweeps are idempotent, so an overlapping or repeated run is
//! harmless. The scheduler invokes the booking service directly; there
//! is no job queue in between.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use arena_core::config::worker::WorkerConfig;
use arena_core::error::AppError;
use arena_service::BookingService;

/// Cron-based scheduler for the booking maintenance sweeps.
pub struct SweepScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Booking service whose sweeps are invoked.
    bookings: Arc<BookingService>,
    /// Schedule configuration.
    config: WorkerConfig,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler").finish()
    }
}

impl SweepScheduler {
    /// Create a new sweep scheduler.
    pub async fn new(bookings: Arc<BookingService>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            bookings,
            config,
        })
    }

    /// Register both sweeps and start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!("Background scheduler disabled by configuration");
            return Ok(());
        }

        self.register_booking_sweep().await?;
        self.register_payment_expiry().await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Sweep scheduler started");
        Ok(())
    }

    /// Shut down the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Sweep scheduler shut down");
        Ok(())
    }

    /// Elapsed-booking sweep: marks live bookings whose window has
    /// passed as completed.
    async fn register_booking_sweep(&self) -> Result<(), AppError> {
        let bookings = Arc::clone(&self.bookings);
        let schedule = self.config.booking_sweep_schedule.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let bookings = Arc::clone(&bookings);
            Box::pin(async move {
                tracing::debug!("Running elapsed-booking sweep");
                match bookings.sweep_elapsed_bookings(Utc::now()).await {
                    Ok(count) if count > 0 => {
                        tracing::info!("Elapsed-booking sweep completed {} bookings", count);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("Elapsed-booking sweep failed: {}", e),
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create booking sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add booking sweep schedule: {}", e))
        })?;

        tracing::info!("Registered: booking sweep ({})", schedule);
        Ok(())
    }

    /// Pending-payment expiry: cancels pending bookings whose payment
    /// hold has lapsed.
    async fn register_payment_expiry(&self) -> Result<(), AppError> {
        let bookings = Arc::clone(&self.bookings);
        let schedule = self.config.payment_expiry_schedule.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let bookings = Arc::clone(&bookings);
            Box::pin(async move {
                tracing::debug!("Running pending-payment expiry sweep");
                match bookings.expire_unpaid_pending(Utc::now()).await {
                    Ok(count) if count > 0 => {
                        tracing::info!("Payment expiry sweep cancelled {} bookings", count);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("Payment expiry sweep failed: {}", e),
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create payment expiry schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add payment expiry schedule: {}", e))
        })?;

        tracing::info!("Registered: payment expiry ({})", schedule);
        Ok(())
    }
}
