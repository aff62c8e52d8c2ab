use futures::stream::BoxStream;

use crate::domain::{Conversation, ConversationId, Message, ParticipantId};

/// Row-level change notification emitted after a successful commit.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    ConversationCreated(Conversation),
    ConversationUpdated(Conversation),
    MessageInserted {
        conversation: Conversation,
        message: Message,
    },
}

impl ChangeEvent {
    pub fn conversation(&self) -> &Conversation {
        match self {
            ChangeEvent::ConversationCreated(c) => c,
            ChangeEvent::ConversationUpdated(c) => c,
            ChangeEvent::MessageInserted { conversation, .. } => conversation,
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation().id
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.conversation().is_participant(participant)
    }
}

/// What a raw feed subscription yields.
#[derive(Debug, Clone)]
pub enum FeedItem {
    Event(ChangeEvent),
    /// The subscriber fell behind and `missed` events were dropped.
    Lagged { missed: u64 },
}

pub trait ChangeFeed: Send + Sync {
    fn publish(&self, event: ChangeEvent);

    /// Every event published after this call, in publication order.
    fn subscribe(&self) -> BoxStream<'static, FeedItem>;
}
