use uuid::Uuid;

use crate::domain::{ConversationId, MessageId};

use super::ApiError;

pub fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    Uuid::parse_str(raw)
        .map(ConversationId::from_uuid)
        .map_err(|_| ApiError::BadRequest(format!("Invalid conversation ID: {}", raw)))
}

pub fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    Uuid::parse_str(raw)
        .map(MessageId::from_uuid)
        .map_err(|_| ApiError::BadRequest(format!("Invalid message ID: {}", raw)))
}
