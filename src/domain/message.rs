use chrono::{DateTime, Utc};

use super::{ConversationId, MessageId, MessageKind, ParticipantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: ParticipantId,
    pub kind: MessageKind,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    pub fn new(
        conversation_id: ConversationId,
        sender_id: ParticipantId,
        kind: MessageKind,
        payload: String,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            kind,
            payload,
            created_at: Utc::now(),
            is_read: false,
        }
    }

    /// Whether this message counts towards `viewer`'s unread total.
    pub fn is_unread_for(&self, viewer: ParticipantId) -> bool {
        !self.is_read && self.sender_id != viewer
    }
}
