//! Append-only booking history entries.
//!
//! A history row is written after every mutating transition has durably
//! succeeded, capturing before/after snapshots of the mutated fields and
//! the responsible actor. Rows are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arena_core::types::{BookingId, HistoryEntryId, UserId};

use crate::actor::ActorRole;

/// An immutable history entry recording one booking transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingHistoryEntry {
    /// Unique history entry identifier.
    pub id: HistoryEntryId,
    /// The booking this entry belongs to.
    pub booking_id: BookingId,
    /// The action performed (e.g. `"booking.created"`, `"booking.cancelled"`).
    pub action: String,
    /// The user who performed the action, if any (sweeps have none).
    pub actor_id: Option<UserId>,
    /// The acting role.
    pub actor_role: ActorRole,
    /// Snapshot of the mutated fields before the transition (JSON).
    pub before_state: Option<serde_json::Value>,
    /// Snapshot of the mutated fields after the transition (JSON).
    pub after_state: Option<serde_json::Value>,
    /// Free-text notes (e.g. a cancellation reason).
    pub notes: Option<String>,
    /// When the transition occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHistoryEntry {
    /// The booking this entry belongs to.
    pub booking_id: BookingId,
    /// The action performed.
    pub action: String,
    /// The user who performed the action.
    pub actor_id: Option<UserId>,
    /// The acting role.
    pub actor_role: ActorRole,
    /// Before snapshot.
    pub before_state: Option<serde_json::Value>,
    /// After snapshot.
    pub after_state: Option<serde_json::Value>,
    /// Free-text notes.
    pub notes: Option<String>,
}
