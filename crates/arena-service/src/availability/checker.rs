//! Slot availability checking.
//!
//! The check is a pure read over the field's resolved schedule and the
//! live bookings for the date. It is advisory: the exclusion constraint
//! on the bookings table decides races, so a stale cached answer can
//! cost a round trip but never a double booking. Results are cached per
//! field/date with a short TTL and invalidated on every booking
//! mutation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use arena_cache::CacheManager;
use arena_cache::keys;
use arena_core::AppResult;
use arena_core::config::booking::BookingConfig;
use arena_core::traits::cache::CacheProvider;
use arena_core::types::{BookingId, TimeOfDay, TimeRange};
use arena_database::repositories::booking::BookingRepository;
use arena_entity::booking::Booking;
use arena_entity::field::{Field, ScheduleSlot};

/// Classification of one declared schedule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Open and not taken.
    Available,
    /// The schedule marks the slot closed.
    ScheduleUnavailable,
    /// A live booking occupies (part of) the slot.
    Booked,
}

/// One declared slot with its availability classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    /// Slot start (inclusive).
    pub start_time: TimeOfDay,
    /// Slot end (exclusive).
    pub end_time: TimeOfDay,
    /// Availability classification.
    pub state: SlotState,
    /// For booked slots, the occupying booking's reference.
    pub reason: Option<String>,
}

/// The full availability picture of a field on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    /// The date described.
    pub date: NaiveDate,
    /// Each declared slot, classified.
    pub slots: Vec<SlotView>,
    /// Number of declared slots.
    pub total_slots: usize,
    /// Slots open for booking.
    pub available_slots: usize,
    /// Slots the schedule closes.
    pub unavailable_slots: usize,
    /// Slots taken by live bookings.
    pub booked_slots: usize,
}

/// Checks whether a field is free for a date and time range.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    /// Booking repository, for live reservations.
    booking_repo: Arc<BookingRepository>,
    /// Best-effort availability cache.
    cache: Arc<CacheManager>,
    /// TTL for cached availability results.
    ttl: Duration,
}

impl AvailabilityChecker {
    /// Creates a checker.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        cache: Arc<CacheManager>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            booking_repo,
            cache,
            ttl: Duration::from_secs(config.availability_cache_ttl_seconds),
        }
    }

    /// Whether `field` is free for `range` on `date`.
    ///
    /// `exclude` ignores one booking's own reservation, for reschedule
    /// checks. "Not open at this time" is `false`, not an error. The
    /// answer is advisory; the reservation write re-validates atomically.
    pub async fn is_available(
        &self,
        field: &Field,
        date: NaiveDate,
        range: TimeRange,
        exclude: Option<BookingId>,
    ) -> AppResult<bool> {
        // Reschedule checks bypass the cache: the cached verdict does
        // not know which booking to ignore.
        let cache_key = (exclude.is_none()).then(|| {
            keys::slot_availability(
                field.id.into_uuid(),
                date,
                range.start.minutes(),
                range.end.minutes(),
            )
        });

        if let Some(key) = &cache_key {
            if let Some(cached) = self.cache_get::<bool>(key).await {
                return Ok(cached);
            }
        }

        let available = if !field.is_active
            || !schedule_allows(field.schedule_for(date), &range)
        {
            false
        } else {
            self.booking_repo
                .find_overlapping(field.id, date, range, exclude)
                .await?
                .is_empty()
        };

        if let Some(key) = &cache_key {
            self.cache_set(key, &available).await;
        }
        Ok(available)
    }

    /// Classify every declared slot of the field's day: available,
    /// schedule-unavailable, or booked with the occupying reference.
    /// Used by calendar UIs, never by the reservation decision.
    pub async fn comprehensive_availability(
        &self,
        field: &Field,
        date: NaiveDate,
    ) -> AppResult<DayAvailability> {
        let key = keys::field_availability(field.id.into_uuid(), date);
        if let Some(cached) = self.cache_get::<DayAvailability>(&key).await {
            return Ok(cached);
        }

        let bookings = self
            .booking_repo
            .find_live_by_field_date(field.id, date)
            .await?;
        let view = classify_day(date, field.schedule_for(date), &bookings);

        self.cache_set(&key, &view).await;
        Ok(view)
    }

    /// Drop every cached availability entry for a field/date. Called
    /// after any write that occupies or releases a slot.
    pub async fn invalidate(&self, field: &Field, date: NaiveDate) {
        let pattern = keys::field_date_pattern(field.id.into_uuid(), date);
        if let Err(e) = self.cache.delete_pattern(&pattern).await {
            debug!(pattern, error = %e, "Availability cache invalidation failed");
        }
    }

    async fn cache_get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.cache.provider().get(key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                debug!(key, error = %e, "Availability cache read failed");
                None
            }
        }
    }

    async fn cache_set<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(json) = serde_json::to_string(value) else {
            return;
        };
        if let Err(e) = self.cache.provider().set(key, &json, self.ttl).await {
            debug!(key, error = %e, "Availability cache write failed");
        }
    }
}

/// Whether the declared schedule opens the whole of `range`.
///
/// The union of available slot windows must cover the range; a request
/// spanning two back-to-back open slots is allowed, one crossing a
/// closed gap is not.
pub fn schedule_allows(slots: &[ScheduleSlot], range: &TimeRange) -> bool {
    let mut windows: Vec<TimeRange> = slots
        .iter()
        .filter(|s| s.is_available)
        .map(ScheduleSlot::window)
        .collect();
    windows.sort_by_key(|w| w.start);

    let mut merged: Vec<TimeRange> = Vec::new();
    for w in windows {
        match merged.last_mut() {
            Some(last) if w.start <= last.end => {
                if w.end > last.end {
                    last.end = w.end;
                }
            }
            _ => merged.push(w),
        }
    }

    merged.iter().any(|m| m.contains_range(range))
}

/// Classify each declared slot against the live bookings for the date.
fn classify_day(date: NaiveDate, slots: &[ScheduleSlot], bookings: &[Booking]) -> DayAvailability {
    let views: Vec<SlotView> = slots
        .iter()
        .map(|slot| {
            if !slot.is_available {
                return SlotView {
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    state: SlotState::ScheduleUnavailable,
                    reason: None,
                };
            }
            let window = slot.window();
            match bookings.iter().find(|b| b.time_range().overlaps(&window)) {
                Some(booking) => SlotView {
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    state: SlotState::Booked,
                    reason: Some(format!(
                        "Booked by {} ({})",
                        booking.booking_number, booking.status
                    )),
                },
                None => SlotView {
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    state: SlotState::Available,
                    reason: None,
                },
            }
        })
        .collect();

    let available = views.iter().filter(|v| v.state == SlotState::Available).count();
    let unavailable = views
        .iter()
        .filter(|v| v.state == SlotState::ScheduleUnavailable)
        .count();
    let booked = views.iter().filter(|v| v.state == SlotState::Booked).count();

    DayAvailability {
        date,
        total_slots: views.len(),
        available_slots: available,
        unavailable_slots: unavailable,
        booked_slots: booked,
        slots: views,
    }
}
