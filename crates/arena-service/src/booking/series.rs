//! Recurring series date expansion.
//!
//! A membership request expands into an ordered list of occurrence
//! dates; each date then goes through availability and pricing exactly
//! like a regular booking, with failures collected per occurrence rather
//! than aborting the series.

use chrono::{Datelike, Days, NaiveDate};

use arena_core::AppResult;
use arena_core::config::booking::BookingConfig;
use arena_core::error::AppError;
use arena_core::types::DayOfWeek;
use arena_entity::booking::{MembershipBookingRequest, RecurrencePattern};

/// Expands membership requests into occurrence dates.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    /// Upper bound on occurrences a single request may expand into.
    max_occurrences: u32,
}

impl SeriesGenerator {
    /// Creates a generator from booking configuration.
    pub fn new(config: &BookingConfig) -> Self {
        Self {
            max_occurrences: config.max_series_occurrences.max(1),
        }
    }

    /// The ordered occurrence dates for a membership request.
    ///
    /// Starts from the first date on/after `start_date` falling on the
    /// requested weekday, then advances by 7 days (weekly), 14 days
    /// (biweekly), or one calendar month preserving the
    /// nth-weekday-of-month position (monthly; a month without an nth
    /// occurrence falls back to its last). An explicit occurrence count
    /// above the configured maximum is rejected; an `end_date` series is
    /// truncated at the maximum.
    pub fn occurrence_dates(&self, request: &MembershipBookingRequest) -> AppResult<Vec<NaiveDate>> {
        request.validate()?;

        if let Some(count) = request.total_occurrences {
            if count > self.max_occurrences {
                return Err(AppError::validation(format!(
                    "Requested {count} occurrences exceeds the maximum of {}",
                    self.max_occurrences
                )));
            }
        }

        let mut date = first_on_or_after(request.start_date, request.day_of_week)?;
        let mut dates = Vec::new();

        loop {
            match (request.total_occurrences, request.end_date) {
                (Some(count), _) if dates.len() as u32 >= count => break,
                (_, Some(end)) if date > end => break,
                _ if dates.len() as u32 >= self.max_occurrences => break,
                _ => {}
            }
            dates.push(date);
            date = match request.recurrence_pattern {
                RecurrencePattern::Weekly => advance_days(date, 7)?,
                RecurrencePattern::Biweekly => advance_days(date, 14)?,
                RecurrencePattern::Monthly => next_month_same_position(date)?,
            };
        }

        Ok(dates)
    }
}

/// First date on or after `start` falling on `day`.
fn first_on_or_after(start: NaiveDate, day: DayOfWeek) -> AppResult<NaiveDate> {
    let offset = (u64::from(day.number()) + 7 - u64::from(DayOfWeek::of(start).number())) % 7;
    advance_days(start, offset)
}

fn advance_days(date: NaiveDate, days: u64) -> AppResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| AppError::validation(format!("Date out of range after {date}")))
}

/// The same nth-weekday position in the following month.
///
/// A fifth occurrence that the next month lacks resolves to that month's
/// last occurrence of the weekday.
fn next_month_same_position(date: NaiveDate) -> AppResult<NaiveDate> {
    let day = DayOfWeek::of(date);
    let nth = (date.day() - 1) / 7 + 1;
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    nth_weekday_of_month(year, month, day, nth)
        .or_else(|| last_weekday_of_month(year, month, day))
        .ok_or_else(|| {
            AppError::validation(format!("Date out of range after {date}"))
        })
}

/// The nth (1-based) occurrence of `day` in a month, if it exists.
fn nth_weekday_of_month(year: i32, month: u32, day: DayOfWeek, nth: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (u64::from(day.number()) + 7 - u64::from(DayOfWeek::of(first).number())) % 7;
    let date = first.checked_add_days(Days::new(offset + 7 * u64::from(nth - 1)))?;
    (date.month() == month).then_some(date)
}

/// The last occurrence of `day` in a month.
fn last_weekday_of_month(year: i32, month: u32, day: DayOfWeek) -> Option<NaiveDate> {
    (1..=5)
        .rev()
        .find_map(|nth| nth_weekday_of_month(year, month, day, nth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::types::{FieldId, StadiumId};

    fn request(
        pattern: RecurrencePattern,
        total: Option<u32>,
        end: Option<NaiveDate>,
    ) -> MembershipBookingRequest {
        MembershipBookingRequest {
            stadium_id: StadiumId::new(),
            field_id: FieldId::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            end_date: end,
            day_of_week: DayOfWeek::Wednesday,
            start_time: "19:00".parse().unwrap(),
            end_time: "21:00".parse().unwrap(),
            recurrence_pattern: pattern,
            total_occurrences: total,
            team_name: None,
        }
    }

    fn generator() -> SeriesGenerator {
        SeriesGenerator::new(&BookingConfig::default())
    }

    #[test]
    fn test_weekly_series_of_26_wednesdays() {
        let dates = generator()
            .occurrence_dates(&request(RecurrencePattern::Weekly, Some(26), None))
            .unwrap();
        assert_eq!(dates.len(), 26);
        // 2025-12-01 is a Monday; the first Wednesday on/after is Dec 3.
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 12, 3).unwrap());
        for pair in dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
        assert!(dates.iter().all(|d| DayOfWeek::of(*d) == DayOfWeek::Wednesday));
        assert_eq!(*dates.last().unwrap(), NaiveDate::from_ymd_opt(2026, 5, 27).unwrap());
    }

    #[test]
    fn test_start_date_on_target_weekday_counts() {
        let mut req = request(RecurrencePattern::Weekly, Some(2), None);
        req.start_date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let dates = generator().occurrence_dates(&req).unwrap();
        assert_eq!(dates[0], req.start_date);
    }

    #[test]
    fn test_biweekly_advances_fourteen_days() {
        let dates = generator()
            .occurrence_dates(&request(RecurrencePattern::Biweekly, Some(4), None))
            .unwrap();
        for pair in dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 14);
        }
    }

    #[test]
    fn test_monthly_preserves_nth_weekday() {
        let dates = generator()
            .occurrence_dates(&request(RecurrencePattern::Monthly, Some(3), None))
            .unwrap();
        // First Wednesdays: Dec 3, Jan 7, Feb 4.
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 12, 3).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());
    }

    #[test]
    fn test_monthly_fifth_weekday_falls_back_to_last() {
        // 2025-12-31 is the fifth Wednesday of December; January 2026
        // has only four, so the series lands on the last one.
        let mut req = request(RecurrencePattern::Monthly, Some(2), None);
        req.start_date = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
        let dates = generator().occurrence_dates(&req).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 1, 28).unwrap());
    }

    #[test]
    fn test_end_date_termination_inclusive() {
        let end = NaiveDate::from_ymd_opt(2025, 12, 17).unwrap();
        let dates = generator()
            .occurrence_dates(&request(RecurrencePattern::Weekly, None, Some(end)))
            .unwrap();
        // Dec 3, 10, 17.
        assert_eq!(dates.len(), 3);
        assert_eq!(*dates.last().unwrap(), end);
    }

    #[test]
    fn test_occurrence_count_above_maximum_rejected() {
        let err = generator()
            .occurrence_dates(&request(RecurrencePattern::Weekly, Some(500), None))
            .unwrap_err();
        assert_eq!(err.kind, arena_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_open_ended_by_end_date_truncates_at_maximum() {
        let far = NaiveDate::from_ymd_opt(2035, 1, 1).unwrap();
        let dates = generator()
            .occurrence_dates(&request(RecurrencePattern::Weekly, None, Some(far)))
            .unwrap();
        assert_eq!(dates.len() as u32, BookingConfig::default().max_series_occurrences);
    }
}
