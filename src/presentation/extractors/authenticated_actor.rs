use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::application::services::MessagingError;
use crate::domain::{Actor, ActorRole, ParticipantId};
use crate::presentation::handlers::ApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Identity asserted by the upstream identity provider.
///
/// The gateway in front of this service verifies the session and forwards
/// the actor as `x-actor-id` / `x-actor-role`. This service must not be
/// reachable without passing through that gateway.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor(pub Actor);

impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .filter(|uuid| !uuid.is_nil());

        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<ActorRole>().ok());

        match (id, role) {
            (Some(id), Some(role)) => Ok(Self(Actor::new(ParticipantId::from_uuid(id), role))),
            _ => {
                tracing::warn!("Request without a valid forwarded identity");
                Err(ApiError::from(MessagingError::Unauthenticated))
            }
        }
    }
}
