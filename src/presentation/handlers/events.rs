use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Serialize;

use crate::application::ports::ChangeEvent;
use crate::application::services::{Subscription, SubscriptionItem};
use crate::presentation::extractors::AuthenticatedActor;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{ConversationResponse, MessageResponse};
use super::ids::parse_conversation_id;

#[derive(Serialize)]
struct ResyncPayload {
    missed: u64,
}

/// Live events of one conversation, for the detail view.
#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn conversation_events_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_conversation_id(&conversation_id)?;
    let subscription = state
        .fan_out_service
        .subscribe_conversation(id, &actor)
        .await?;

    Ok(into_sse(
        subscription,
        state.settings.realtime.sse_keep_alive_seconds,
    ))
}

/// Live events of every conversation the caller takes part in, for the list
/// view and the unread badge.
#[tracing::instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn inbox_events_handler(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> impl IntoResponse {
    let subscription = state.fan_out_service.subscribe_inbox(&actor);
    into_sse(
        subscription,
        state.settings.realtime.sse_keep_alive_seconds,
    )
}

fn into_sse(mut subscription: Subscription, keep_alive_seconds: u64) -> impl IntoResponse {
    let sse_stream = async_stream::stream! {
        while let Some(item) = subscription.next().await {
            yield Ok::<_, Infallible>(to_sse_event(&item));
        }
    };

    Sse::new(sse_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(keep_alive_seconds))
            .text("keep-alive"),
    )
}

fn to_sse_event(item: &SubscriptionItem) -> Event {
    match item {
        SubscriptionItem::Event(ChangeEvent::MessageInserted { message, .. }) => {
            named_event("message", &MessageResponse::from(message))
        }
        SubscriptionItem::Event(
            ChangeEvent::ConversationCreated(conversation)
            | ChangeEvent::ConversationUpdated(conversation),
        ) => named_event("conversation", &ConversationResponse::from(conversation)),
        SubscriptionItem::Resync { missed } => {
            named_event("resync", &ResyncPayload { missed: *missed })
        }
    }
}

fn named_event<T: Serialize>(name: &str, payload: &T) -> Event {
    let json = serde_json::to_string(payload).unwrap_or_else(|e| {
        tracing::error!(error = %e, event = name, "Failed to serialize SSE payload");
        String::new()
    });
    Event::default().event(name).data(json)
}
