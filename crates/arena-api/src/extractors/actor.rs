//! `Actor` extractor — reads the forwarded identity headers and injects
//! a request context.
//!
//! Authentication happens upstream at the gateway, which forwards the
//! verified identity as `X-Actor-Id` and `X-Actor-Role`. The `system`
//! role is reserved for in-process callers and never accepted from a
//! header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use arena_core::error::AppError;
use arena_core::types::UserId;
use arena_entity::actor::ActorRole;
use arena_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted actor context available in handlers.
#[derive(Debug, Clone)]
pub struct Actor(pub RequestContext);

impl Actor {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for Actor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authorization("Missing X-Actor-Id header"))?
            .parse::<UserId>()
            .map_err(|_| AppError::authorization("Invalid X-Actor-Id header"))?;

        let role = match parts.headers.get("x-actor-role") {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::authorization("Invalid X-Actor-Role header"))?
                .parse::<ActorRole>()
                .map_err(|e| AppError::authorization(e.message))?,
            None => ActorRole::User,
        };
        if role == ActorRole::System {
            return Err(ApiError(AppError::authorization(
                "The system role is not accepted from request headers",
            )));
        }

        Ok(Actor(RequestContext::new(actor_id, role)))
    }
}
