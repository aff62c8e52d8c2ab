use crate::application::ports::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("invalid participants: {0}")]
    InvalidParticipants(String),
    #[error("not a participant of conversation")]
    NotAParticipant,
    #[error("message content is empty")]
    EmptyContent,
    #[error("message content exceeds {max} characters")]
    ContentTooLong { max: usize },
    #[error("invalid attachment reference: {0}")]
    InvalidAttachment(String),
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),
    #[error("message not found: {0}")]
    MessageNotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] RepositoryError),
    #[error("unauthenticated")]
    Unauthenticated,
}

impl From<RepositoryError> for MessagingError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(what) => MessagingError::ConversationNotFound(what),
            other => MessagingError::StoreUnavailable(other),
        }
    }
}
