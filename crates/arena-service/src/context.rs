//! Request context carrying the acting user and their role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arena_core::types::UserId;
use arena_entity::actor::ActorRole;

/// Context for the current request.
///
/// Authentication happens upstream; the API layer extracts the verified
/// actor identity and passes it into service methods so that every
/// operation knows *who* is acting. Scheduled sweeps use the `system`
/// context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID, if the actor is a person.
    pub actor_id: Option<UserId>,
    /// The acting role.
    pub role: ActorRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a human actor.
    pub fn new(actor_id: UserId, role: ActorRole) -> Self {
        Self {
            actor_id: Some(actor_id),
            role,
            request_time: Utc::now(),
        }
    }

    /// Creates the context used by scheduled sweeps.
    pub fn system() -> Self {
        Self {
            actor_id: None,
            role: ActorRole::System,
            request_time: Utc::now(),
        }
    }

    /// Whether the actor may act on bookings they do not own.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self.role,
            ActorRole::Staff | ActorRole::Owner | ActorRole::Admin | ActorRole::System
        )
    }
}
