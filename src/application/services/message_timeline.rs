use std::collections::HashSet;

use crate::domain::{ConversationId, Message, MessageId};

/// Consumer-side, de-duplicated view of one conversation's messages.
///
/// The change feed may redeliver a message (reconnects, self-echo of a just
/// sent message). Applying a message already present is a no-op.
#[derive(Debug, Clone)]
pub struct MessageTimeline {
    conversation_id: ConversationId,
    messages: Vec<Message>,
    seen: HashSet<MessageId>,
}

impl MessageTimeline {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Replaces the view with an authoritative fetch, e.g. after a resync.
    pub fn reset(&mut self, messages: Vec<Message>) {
        self.messages.clear();
        self.seen.clear();
        for message in messages {
            self.apply(message);
        }
    }

    /// Returns `true` when the message was new to this view.
    pub fn apply(&mut self, message: Message) -> bool {
        if message.conversation_id != self.conversation_id || !self.seen.insert(message.id) {
            return false;
        }

        // Feed order matches commit order, so this is almost always a push.
        let position = self
            .messages
            .partition_point(|m| m.created_at <= message.created_at);
        self.messages.insert(position, message);
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
