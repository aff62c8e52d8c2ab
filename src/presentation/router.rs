use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    conversation_events_handler, conversation_unread_handler, get_conversation_handler,
    health_handler, inbox_events_handler, list_conversations_handler, list_messages_handler,
    mark_message_read_handler, mark_read_handler, send_message_handler,
    start_conversation_handler, total_unread_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/conversations",
            get(list_conversations_handler).post(start_conversation_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}",
            get(get_conversation_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/messages",
            get(list_messages_handler).post(send_message_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/read",
            post(mark_read_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/unread",
            get(conversation_unread_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/events",
            get(conversation_events_handler),
        )
        .route(
            "/api/v1/messages/{message_id}/read",
            post(mark_message_read_handler),
        )
        .route("/api/v1/unread", get(total_unread_handler))
        .route("/api/v1/events", get(inbox_events_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
