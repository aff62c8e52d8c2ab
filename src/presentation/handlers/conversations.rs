use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::domain::{ParticipantId, ProductId};
use crate::presentation::extractors::AuthenticatedActor;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{ConversationResponse, ConversationSummaryResponse, StartConversationRequest};
use super::ids::parse_conversation_id;

#[tracing::instrument(skip(state, actor, request), fields(actor_id = %actor.id))]
pub async fn start_conversation_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Json(request): Json<StartConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product_id = request.product_id.map(ProductId::from_uuid);
    let service = &state.conversation_service;

    let conversation = match request.counterpart_id {
        Some(counterpart) => {
            service
                .start_conversation(&actor, ParticipantId::from_uuid(counterpart), product_id)
                .await?
        }
        None => {
            // Absent ids become nil, which the resolver rejects.
            let customer = ParticipantId::from_uuid(request.customer_id.unwrap_or(Uuid::nil()));
            let vendor = ParticipantId::from_uuid(request.vendor_id.unwrap_or(Uuid::nil()));
            service
                .resolve_conversation(&actor, customer, vendor, product_id)
                .await?
        }
    };

    Ok((StatusCode::OK, Json(ConversationResponse::from(&conversation))))
}

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.conversation_service.list_conversations(&actor).await?;

    let response: Vec<ConversationSummaryResponse> = summaries
        .iter()
        .map(ConversationSummaryResponse::from)
        .collect();

    Ok(Json(response))
}

#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn get_conversation_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;
    let conversation = state.conversation_service.get_conversation(&actor, id).await?;

    Ok(Json(ConversationResponse::from(&conversation)))
}
