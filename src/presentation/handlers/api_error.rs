use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::MessagingError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Messaging(MessagingError),
}

impl From<MessagingError> for ApiError {
    fn from(e: MessagingError) -> Self {
        ApiError::Messaging(e)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Messaging(e) => match e {
                MessagingError::InvalidParticipants(_)
                | MessagingError::EmptyContent
                | MessagingError::ContentTooLong { .. }
                | MessagingError::InvalidAttachment(_) => StatusCode::BAD_REQUEST,
                MessagingError::Unauthenticated => StatusCode::UNAUTHORIZED,
                MessagingError::NotAParticipant => StatusCode::FORBIDDEN,
                MessagingError::ConversationNotFound(_) | MessagingError::MessageNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                MessagingError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Messaging(e) => match e {
                MessagingError::InvalidParticipants(_) => "INVALID_PARTICIPANTS",
                MessagingError::NotAParticipant => "NOT_A_PARTICIPANT",
                MessagingError::EmptyContent => "EMPTY_CONTENT",
                MessagingError::ContentTooLong { .. } => "CONTENT_TOO_LONG",
                MessagingError::InvalidAttachment(_) => "INVALID_ATTACHMENT",
                MessagingError::ConversationNotFound(_) => "CONVERSATION_NOT_FOUND",
                MessagingError::MessageNotFound(_) => "MESSAGE_NOT_FOUND",
                MessagingError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
                MessagingError::Unauthenticated => "UNAUTHENTICATED",
            },
        }
    }

    /// Client-facing text. Infrastructure details and participant-check
    /// specifics stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Messaging(MessagingError::NotAParticipant) => {
                "Unable to access this conversation".to_string()
            }
            ApiError::Messaging(MessagingError::StoreUnavailable(_)) => {
                "Messaging is temporarily unavailable, please retry".to_string()
            }
            ApiError::Messaging(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, error_code = code, "Request failed");
        } else {
            tracing::debug!(error = ?self, error_code = code, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.user_message(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
