//! Pricing tier and seasonal rate value objects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use arena_core::types::{DayOfWeek, TimeOfDay, TimeRange};

/// A named, time-and-day-bounded override of a field's hourly rate.
///
/// Tiers are scanned in declaration order and the first active,
/// applicable tier wins. Overlapping active tiers are a configuration
/// smell, resolved by declaration order rather than specificity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    /// Display name (e.g. `"evening"`, `"weekend_peak"`).
    pub name: String,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
    /// Days of the week this tier applies to.
    pub days_of_week: Vec<DayOfWeek>,
    /// Hourly rate while the tier applies, in minor currency units.
    pub rate: i64,
    /// Whether the tier participates in resolution at all.
    pub is_active: bool,
}

impl PricingTier {
    /// The tier's half-open time window.
    pub fn window(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether the tier applies at the given day and instant.
    pub fn applies(&self, day: DayOfWeek, instant: TimeOfDay) -> bool {
        self.is_active && self.days_of_week.contains(&day) && self.window().contains_instant(instant)
    }
}

/// A date-bounded override of the field's base hourly rate.
///
/// Seasonal rates are resolved before tier resolution and supersede the
/// base rate used as the tier fallback. Date bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalRate {
    /// Display name (e.g. `"summer_high_season"`).
    pub name: String,
    /// First date the rate applies.
    pub start_date: NaiveDate,
    /// Last date the rate applies.
    pub end_date: NaiveDate,
    /// Replacement base hourly rate.
    pub rate: i64,
}

impl SeasonalRate {
    /// Whether the seasonal rate covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_applies_respects_day_window_and_flag() {
        let tier = PricingTier {
            name: "evening".to_string(),
            start_time: "18:00".parse().unwrap(),
            end_time: "22:00".parse().unwrap(),
            days_of_week: vec![DayOfWeek::Friday],
            rate: 150_000,
            is_active: true,
        };
        assert!(tier.applies(DayOfWeek::Friday, "19:00".parse().unwrap()));
        assert!(!tier.applies(DayOfWeek::Monday, "19:00".parse().unwrap()));
        // End is exclusive.
        assert!(!tier.applies(DayOfWeek::Friday, "22:00".parse().unwrap()));

        let inactive = PricingTier {
            is_active: false,
            ..tier
        };
        assert!(!inactive.applies(DayOfWeek::Friday, "19:00".parse().unwrap()));
    }

    #[test]
    fn test_seasonal_covers_inclusive_bounds() {
        let season = SeasonalRate {
            name: "summer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            rate: 120_000,
        };
        assert!(season.covers(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(season.covers(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()));
        assert!(!season.covers(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()));
    }
}
