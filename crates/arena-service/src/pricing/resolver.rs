//! Pricing resolution.
//!
//! Pure functions of the field's configuration: no repository or cache
//! access. Seasonal rates override the base rate by date range; pricing
//! tiers then override the (possibly seasonal) base by day-of-week and
//! time window, first match in declaration order winning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use arena_core::AppResult;
use arena_core::config::booking::BookingConfig;
use arena_core::error::AppError;
use arena_core::types::{DayOfWeek, TimeOfDay, TimeRange};
use arena_entity::field::Field;

/// The priced result for one booking window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowPrice {
    /// Total charge for the window, rounded to the nearest currency unit.
    pub total: i64,
    /// Hourly rate that resolved at the window start.
    pub base_rate: i64,
    /// Name of the tier that applied at the window start, if any.
    pub applied_tier: Option<String>,
    /// Window duration in fractional hours.
    pub duration_hours: f64,
}

/// Resolves hourly rates and prices booking windows.
#[derive(Debug, Clone)]
pub struct PricingResolver {
    /// Sub-increment in minutes used to integrate a rate over a window,
    /// so tiers that begin or end mid-booking are charged correctly.
    increment_minutes: u16,
}

impl PricingResolver {
    /// Creates a resolver from booking configuration.
    pub fn new(config: &BookingConfig) -> Self {
        Self {
            increment_minutes: config.pricing_increment_minutes.max(1),
        }
    }

    /// Resolve the hourly rate applicable at one instant.
    ///
    /// Returns the rate and the name of the tier that supplied it, if
    /// any. The first active tier matching the day and containing the
    /// instant wins; otherwise the seasonal or base rate applies.
    pub fn resolve_rate(
        &self,
        field: &Field,
        date: NaiveDate,
        instant: TimeOfDay,
    ) -> (i64, Option<String>) {
        let day = DayOfWeek::of(date);
        let base = self.seasonal_base(field, date);

        for tier in &field.pricing_tiers {
            if tier.applies(day, instant) {
                return (tier.rate, Some(tier.name.clone()));
            }
        }
        (base, None)
    }

    /// Price a booking window by integrating the resolved rate over
    /// fixed sub-increments.
    ///
    /// Each increment is charged `rate x minutes / 60`; the per-minute
    /// sum is kept exact and the division rounds the total to the
    /// nearest currency unit once, at the end.
    pub fn price_window(
        &self,
        field: &Field,
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<WindowPrice> {
        let (base_rate, applied_tier) = self.resolve_rate(field, date, range.start);

        let mut rate_minutes: i64 = 0;
        let mut cursor = range.start.minutes();
        while cursor < range.end.minutes() {
            let step = self
                .increment_minutes
                .min(range.end.minutes() - cursor);
            let instant = TimeOfDay::from_minutes(cursor).map_err(|e| {
                AppError::internal(format!("Increment start out of range: {e}"))
            })?;
            let (rate, _) = self.resolve_rate(field, date, instant);
            rate_minutes += rate * i64::from(step);
            cursor += step;
        }

        // Round half away from zero; rates are non-negative in practice.
        let total = (rate_minutes + 30) / 60;

        Ok(WindowPrice {
            total,
            base_rate,
            applied_tier,
            duration_hours: range.duration_hours(),
        })
    }

    /// The base rate for a date, after seasonal overrides.
    fn seasonal_base(&self, field: &Field, date: NaiveDate) -> i64 {
        field
            .seasonal_rates
            .iter()
            .find(|s| s.covers(date))
            .map(|s| s.rate)
            .unwrap_or(field.base_hourly_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::types::{FieldId, StadiumId};
    use arena_entity::field::{PricingTier, SeasonalRate};
    use chrono::Utc;

    fn resolver() -> PricingResolver {
        PricingResolver::new(&BookingConfig::default())
    }

    fn field_with(tiers: Vec<PricingTier>, seasonal: Vec<SeasonalRate>) -> Field {
        Field {
            id: FieldId::new(),
            stadium_id: StadiumId::new(),
            name: "Pitch 1".to_string(),
            field_type: "football_5".to_string(),
            surface: "grass".to_string(),
            base_hourly_rate: 100_000,
            currency: "VND".to_string(),
            pricing_tiers: tiers,
            seasonal_rates: seasonal,
            weekly_schedule: Vec::new(),
            special_dates: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn evening_tier() -> PricingTier {
        PricingTier {
            name: "evening".to_string(),
            start_time: "18:00".parse().unwrap(),
            end_time: "22:00".parse().unwrap(),
            days_of_week: DayOfWeek::ALL.to_vec(),
            rate: 150_000,
            is_active: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_tier_window_prices_at_tier_rate() {
        let field = field_with(vec![evening_tier()], Vec::new());
        let range = TimeRange::parse("19:00", "21:00").unwrap();
        let price = resolver().price_window(&field, date(), range).unwrap();
        assert_eq!(price.total, 300_000);
        assert_eq!(price.base_rate, 150_000);
        assert_eq!(price.applied_tier.as_deref(), Some("evening"));
        assert!((price.duration_hours - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_off_tier_window_prices_at_base_rate() {
        let field = field_with(vec![evening_tier()], Vec::new());
        let range = TimeRange::parse("16:00", "18:00").unwrap();
        let price = resolver().price_window(&field, date(), range).unwrap();
        assert_eq!(price.total, 200_000);
        assert_eq!(price.base_rate, 100_000);
        assert_eq!(price.applied_tier, None);
    }

    #[test]
    fn test_window_straddling_tier_boundary() {
        let field = field_with(vec![evening_tier()], Vec::new());
        // 17:00-19:00: one hour at base, one at the tier rate.
        let range = TimeRange::parse("17:00", "19:00").unwrap();
        let price = resolver().price_window(&field, date(), range).unwrap();
        assert_eq!(price.total, 250_000);
        assert_eq!(price.applied_tier, None);
    }

    #[test]
    fn test_inactive_tier_is_skipped() {
        let mut tier = evening_tier();
        tier.is_active = false;
        let field = field_with(vec![tier], Vec::new());
        let (rate, name) = resolver().resolve_rate(&field, date(), "19:00".parse().unwrap());
        assert_eq!(rate, 100_000);
        assert_eq!(name, None);
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let mut second = evening_tier();
        second.name = "evening_late".to_string();
        second.rate = 180_000;
        let field = field_with(vec![evening_tier(), second], Vec::new());
        let (rate, name) = resolver().resolve_rate(&field, date(), "19:00".parse().unwrap());
        assert_eq!(rate, 150_000);
        assert_eq!(name.as_deref(), Some("evening"));
    }

    #[test]
    fn test_tier_restricted_to_other_day_falls_back() {
        let mut tier = evening_tier();
        tier.days_of_week = vec![DayOfWeek::Saturday];
        let field = field_with(vec![tier], Vec::new());
        // 2025-12-01 is a Monday.
        let (rate, _) = resolver().resolve_rate(&field, date(), "19:00".parse().unwrap());
        assert_eq!(rate, 100_000);
    }

    #[test]
    fn test_seasonal_rate_replaces_base_not_tier() {
        let season = SeasonalRate {
            name: "december_peak".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            rate: 120_000,
        };
        let field = field_with(vec![evening_tier()], vec![season]);
        // Off-tier time picks up the seasonal base.
        let (off_tier, _) = resolver().resolve_rate(&field, date(), "10:00".parse().unwrap());
        assert_eq!(off_tier, 120_000);
        // Tier still wins inside its window.
        let (in_tier, _) = resolver().resolve_rate(&field, date(), "19:00".parse().unwrap());
        assert_eq!(in_tier, 150_000);
        // Outside the season the plain base applies.
        let january = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let (post_season, _) = resolver().resolve_rate(&field, january, "10:00".parse().unwrap());
        assert_eq!(post_season, 100_000);
    }

    #[test]
    fn test_partial_increment_is_charged_proportionally() {
        let field = field_with(Vec::new(), Vec::new());
        // 45 minutes at 100,000/h = 75,000.
        let range = TimeRange::parse("09:00", "09:45").unwrap();
        let price = resolver().price_window(&field, date(), range).unwrap();
        assert_eq!(price.total, 75_000);
    }
}
