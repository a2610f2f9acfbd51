//! Field entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arena_core::types::{FieldId, StadiumId};

use super::pricing::{PricingTier, SeasonalRate};
use super::schedule::{DaySchedule, ScheduleSlot, SpecialDate};

/// A bookable field belonging to exactly one stadium.
///
/// Pricing tiers, seasonal rates, the weekly schedule, and special-date
/// overrides are embedded JSON documents; they are configuration data
/// read as a unit with the field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Field {
    /// Unique field identifier.
    pub id: FieldId,
    /// Owning stadium.
    pub stadium_id: StadiumId,
    /// Display name.
    pub name: String,
    /// Field type (e.g. `"football_5"`, `"football_11"`, `"tennis"`).
    pub field_type: String,
    /// Playing surface (e.g. `"grass"`, `"artificial_turf"`).
    pub surface: String,
    /// Base hourly rate in minor currency units.
    pub base_hourly_rate: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Time-and-day-bounded rate overrides, first match wins.
    #[sqlx(json)]
    pub pricing_tiers: Vec<PricingTier>,
    /// Date-bounded base-rate overrides.
    #[sqlx(json)]
    pub seasonal_rates: Vec<SeasonalRate>,
    /// One entry per day of week.
    #[sqlx(json)]
    pub weekly_schedule: Vec<DaySchedule>,
    /// Calendar-date overrides replacing the weekly schedule.
    #[sqlx(json)]
    pub special_dates: Vec<SpecialDate>,
    /// Whether the field accepts bookings.
    pub is_active: bool,
    /// When the field was created.
    pub created_at: DateTime<Utc>,
    /// When the field was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Field {
    /// Resolve the schedule slots that govern a calendar date.
    ///
    /// A special-date override takes precedence over the weekly schedule;
    /// if neither exists the field is closed that day.
    pub fn schedule_for(&self, date: NaiveDate) -> &[ScheduleSlot] {
        if let Some(special) = self.special_dates.iter().find(|s| s.date == date) {
            return &special.slots;
        }
        let day = arena_core::types::DayOfWeek::of(date);
        self.weekly_schedule
            .iter()
            .find(|d| d.day_of_week == day)
            .map(|d| d.slots.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::types::DayOfWeek;

    fn slot(start: &str, end: &str, available: bool) -> ScheduleSlot {
        ScheduleSlot {
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            is_available: available,
            special_rate: None,
        }
    }

    fn field() -> Field {
        Field {
            id: FieldId::new(),
            stadium_id: StadiumId::new(),
            name: "Pitch 1".to_string(),
            field_type: "football_5".to_string(),
            surface: "artificial_turf".to_string(),
            base_hourly_rate: 100_000,
            currency: "VND".to_string(),
            pricing_tiers: Vec::new(),
            seasonal_rates: Vec::new(),
            weekly_schedule: vec![DaySchedule {
                day_of_week: DayOfWeek::Monday,
                slots: vec![slot("08:00", "22:00", true)],
            }],
            special_dates: vec![SpecialDate {
                date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                slots: Vec::new(),
                reason: Some("maintenance".to_string()),
            }],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_special_date_beats_weekly() {
        let f = field();
        // 2025-12-01 is a Monday but fully overridden (closed).
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert!(f.schedule_for(date).is_empty());
    }

    #[test]
    fn test_weekly_schedule_used_without_override() {
        let f = field();
        // The following Monday has no override.
        let date = NaiveDate::from_ymd_opt(2025, 12, 8).unwrap();
        assert_eq!(f.schedule_for(date).len(), 1);
    }

    #[test]
    fn test_unlisted_day_is_closed() {
        let f = field();
        // A Tuesday; no weekly entry declared.
        let date = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();
        assert!(f.schedule_for(date).is_empty());
    }
}
