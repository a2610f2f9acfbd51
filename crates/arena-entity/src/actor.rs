//! Actor role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the actor performing an operation.
///
/// Authentication happens upstream; the engine only needs the role to
/// apply cancellation policy and record history attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "actor_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// An ordinary customer.
    User,
    /// Stadium staff.
    Staff,
    /// Stadium owner.
    Owner,
    /// Platform administrator.
    Admin,
    /// Scheduled sweeps and other automated transitions.
    System,
}

impl ActorRole {
    /// Whether the role bypasses the late-cancellation cutoff.
    pub fn bypasses_cancellation_cutoff(&self) -> bool {
        matches!(self, Self::Staff | Self::Owner | Self::Admin | Self::System)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Staff => "staff",
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = arena_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "staff" => Ok(Self::Staff),
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "system" => Ok(Self::System),
            _ => Err(arena_core::AppError::validation(format!(
                "Invalid actor role: '{s}'. Expected one of: user, staff, owner, admin, system"
            ))),
        }
    }
}
