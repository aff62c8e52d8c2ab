use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::MessageKind;
use crate::presentation::extractors::AuthenticatedActor;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{
    MarkMessageReadResponse, MarkReadResponse, MessageResponse, MessagesQuery, SendMessageRequest,
};
use super::ids::{parse_conversation_id, parse_message_id};

#[tracing::instrument(skip(state, actor, query), fields(actor_id = %actor.id))]
pub async fn list_messages_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;
    let max = state.settings.messaging.message_page_limit;
    let limit = query.limit.unwrap_or(max).min(max).max(1);

    let messages = state
        .messaging_service
        .fetch_messages(id, &actor, limit)
        .await?;

    let response: Vec<MessageResponse> = messages.iter().map(MessageResponse::from).collect();
    Ok(Json(response))
}

#[tracing::instrument(skip(state, actor, request), fields(actor_id = %actor.id))]
pub async fn send_message_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;
    let kind = request
        .content_type
        .parse::<MessageKind>()
        .map_err(ApiError::BadRequest)?;

    let message = state
        .messaging_service
        .send(id, &actor, kind, &request.payload)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(&message))))
}

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn mark_read_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;

    let marked = state.messaging_service.mark_read(id, &actor).await?;
    let unread_count = state.messaging_service.unread_count(id, &actor).await?;

    Ok(Json(MarkReadResponse {
        marked,
        unread_count,
    }))
}

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn mark_message_read_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(message_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_message_id(&message_id)?;
    let marked = state.messaging_service.mark_message_read(id, &actor).await?;

    Ok(Json(MarkMessageReadResponse { marked }))
}
