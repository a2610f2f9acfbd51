//! Stadium entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arena_core::AppError;
use arena_core::types::{StadiumId, UserId};

/// A stadium owning fields and a staff roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stadium {
    /// Unique stadium identifier.
    pub id: StadiumId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// IANA time zone name (e.g. `"Asia/Ho_Chi_Minh"`). Cancellation
    /// deadlines are computed in this zone.
    pub timezone: String,
    /// Whether the stadium accepts bookings.
    pub is_active: bool,
    /// When the stadium was created.
    pub created_at: DateTime<Utc>,
    /// When the stadium was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Stadium {
    /// Parse the stadium's configured time zone.
    pub fn tz(&self) -> Result<chrono_tz::Tz, AppError> {
        self.timezone.parse().map_err(|_| {
            AppError::configuration(format!(
                "Stadium '{}' has invalid time zone '{}'",
                self.id, self.timezone
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stadium(timezone: &str) -> Stadium {
        Stadium {
            id: StadiumId::new(),
            owner_id: UserId::new(),
            name: "Central Park Arena".to_string(),
            address: None,
            timezone: timezone.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tz_parses_iana_name() {
        assert_eq!(
            stadium("Asia/Ho_Chi_Minh").tz().unwrap(),
            chrono_tz::Asia::Ho_Chi_Minh
        );
    }

    #[test]
    fn test_tz_rejects_garbage() {
        assert!(stadium("Not/AZone").tz().is_err());
    }
}
