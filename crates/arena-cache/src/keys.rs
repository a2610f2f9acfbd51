//! Cache key builders for all ArenaHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use chrono::NaiveDate;
use uuid::Uuid;

/// Prefix applied to all ArenaHub cache keys.
const PREFIX: &str = "arenahub";

// ── Availability keys ──────────────────────────────────────

/// Cache key for the comprehensive availability view of a field/date.
pub fn field_availability(field_id: Uuid, date: NaiveDate) -> String {
    format!("{PREFIX}:avail:{field_id}:{date}")
}

/// Cache key for one slot-availability verdict on a field/date.
pub fn slot_availability(field_id: Uuid, date: NaiveDate, start_min: u16, end_min: u16) -> String {
    format!("{PREFIX}:avail:{field_id}:{date}:{start_min}-{end_min}")
}

/// Pattern invalidating every availability entry for a field/date.
/// Issued after any write that occupies or releases a slot.
pub fn field_date_pattern(field_id: Uuid, date: NaiveDate) -> String {
    format!("{PREFIX}:avail:{field_id}:{date}*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key() {
        let id = Uuid::nil();
        let date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        assert_eq!(
            slot_availability(id, date, 540, 660),
            "arenahub:avail:00000000-0000-0000-0000-000000000000:2025-12-03:540-660"
        );
    }

    #[test]
    fn test_pattern_covers_slot_keys() {
        let id = Uuid::nil();
        let date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let pattern = field_date_pattern(id, date);
        let prefix = pattern.trim_end_matches('*');
        assert!(slot_availability(id, date, 540, 660).starts_with(prefix));
        assert!(field_availability(id, date).starts_with(prefix));
    }
}
