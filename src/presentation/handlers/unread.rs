use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::domain::UnreadBadge;
use crate::presentation::extractors::AuthenticatedActor;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::UnreadResponse;
use super::ids::parse_conversation_id;

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn total_unread_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<impl IntoResponse, ApiError> {
    let badge = state.messaging_service.total_unread(&actor).await?;
    Ok(Json(UnreadResponse::from(badge)))
}

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn conversation_unread_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;
    let count = state.messaging_service.unread_count(id, &actor).await?;

    Ok(Json(UnreadResponse::from(UnreadBadge::new(count))))
}
