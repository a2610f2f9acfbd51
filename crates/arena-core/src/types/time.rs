//! Time-of-day, time-range, and day-of-week primitives.
//!
//! Every interval in the scheduling engine is half-open: `[start, end)`.
//! Two ranges overlap iff `s1 < e2 && e1 > s2`, so a booking ending exactly
//! when another starts does not conflict. All the overlap decisions in the
//! application reduce to [`TimeRange::overlaps`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minutes in a day.
const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day stored as minutes since midnight.
///
/// Serializes as an `"HH:MM"` string, which is also the wire format used
/// by booking requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Construct from minutes since midnight. `24:00` (1440) is permitted
    /// as an exclusive range end.
    pub fn from_minutes(minutes: u16) -> Result<Self, AppError> {
        if minutes > MINUTES_PER_DAY {
            return Err(AppError::validation(format!(
                "Time of day out of range: {minutes} minutes"
            )));
        }
        Ok(Self(minutes))
    }

    /// Construct from hour and minute components.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, AppError> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(AppError::validation(format!(
                "Invalid time of day: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component.
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component.
    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| AppError::validation(format!("Invalid time format: '{s}'")))?;
        let hour: u16 = h
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid hour in time: '{s}'")))?;
        let minute: u16 = m
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid minute in time: '{s}'")))?;
        Self::from_hm(hour, minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for TimeOfDay {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for TimeOfDay {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&i32::from(self.0), buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TimeOfDay {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let minutes = <i32 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        let minutes = u16::try_from(minutes)?;
        Ok(TimeOfDay::from_minutes(minutes)?)
    }
}

/// A half-open time interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start time.
    pub start: TimeOfDay,
    /// Exclusive end time.
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Construct a range, rejecting empty or inverted intervals.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::validation(format!(
                "Invalid time range: start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from `"HH:MM"` endpoint strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Half-open overlap test: `s1 < e2 && e1 > s2`.
    ///
    /// A range ending exactly when another starts does not overlap it.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether this range fully contains `other`.
    pub fn contains_range(&self, other: &TimeRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Whether an instant falls inside the range (`start` inclusive,
    /// `end` exclusive).
    pub fn contains_instant(&self, instant: TimeOfDay) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Duration of the range in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Duration of the range in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Day of the week, numbered 0 (Sunday) through 6 (Saturday).
///
/// The numeric form matches the wire format used by weekly schedules and
/// membership requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayOfWeek {
    /// Sunday (0).
    Sunday,
    /// Monday (1).
    Monday,
    /// Tuesday (2).
    Tuesday,
    /// Wednesday (3).
    Wednesday,
    /// Thursday (4).
    Thursday,
    /// Friday (5).
    Friday,
    /// Saturday (6).
    Saturday,
}

impl DayOfWeek {
    /// All days, Sunday first.
    pub const ALL: [DayOfWeek; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Numeric form, 0 = Sunday.
    pub fn number(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// Construct from the numeric form.
    pub fn from_number(n: u8) -> Result<Self, AppError> {
        Self::ALL
            .get(usize::from(n))
            .copied()
            .ok_or_else(|| AppError::validation(format!("Invalid day of week: {n}")))
    }

    /// The day of week of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // num_days_from_sunday is 0..=6, always in range.
        Self::ALL[date.weekday().num_days_from_sunday() as usize]
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> u8 {
        day.number()
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = AppError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("9am".parse::<TimeOfDay>().is_err());
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("12:61".parse::<TimeOfDay>().is_err());
        assert!("".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_midnight_end_allowed() {
        let t: TimeOfDay = "24:00".parse().unwrap();
        assert_eq!(t.minutes(), 1440);
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(TimeRange::parse("10:00", "09:00").is_err());
        assert!(TimeRange::parse("10:00", "10:00").is_err());
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let a = range("09:00", "10:00");
        let b = range("10:00", "11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let a = range("09:00", "10:30");
        let b = range("10:00", "11:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_containment() {
        let outer = range("08:00", "12:00");
        let inner = range("09:00", "10:00");
        assert!(outer.contains_range(&inner));
        assert!(!inner.contains_range(&outer));
        assert!(outer.contains_range(&outer));
    }

    #[test]
    fn test_contains_instant_half_open() {
        let r = range("09:00", "10:00");
        assert!(r.contains_instant("09:00".parse().unwrap()));
        assert!(r.contains_instant("09:59".parse().unwrap()));
        assert!(!r.contains_instant("10:00".parse().unwrap()));
    }

    #[test]
    fn test_duration() {
        let r = range("19:00", "21:00");
        assert_eq!(r.duration_minutes(), 120);
        assert!((r.duration_hours() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_day_of_week_of_date() {
        // 2025-12-01 is a Monday.
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(DayOfWeek::of(date), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::Wednesday.number(), 3);
    }

    #[test]
    fn test_day_of_week_from_number() {
        assert_eq!(DayOfWeek::from_number(3).unwrap(), DayOfWeek::Wednesday);
        assert!(DayOfWeek::from_number(7).is_err());
    }
}
