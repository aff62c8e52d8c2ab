use chrono::{DateTime, Utc};

use super::{Conversation, Message, MessagePreview};

/// A conversation as seen by one viewer in the conversation list.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub last_message: Option<Message>,
    pub preview: MessagePreview,
    pub last_activity_at: DateTime<Utc>,
    pub unread_count: u64,
}

impl ConversationSummary {
    pub fn new(conversation: Conversation, last_message: Option<Message>, unread_count: u64) -> Self {
        let preview = MessagePreview::from_last_message(last_message.as_ref());
        let last_activity_at = last_message
            .as_ref()
            .map(|m| m.created_at)
            .unwrap_or(conversation.updated_at);

        Self {
            conversation,
            last_message,
            preview,
            last_activity_at,
            unread_count,
        }
    }
}
