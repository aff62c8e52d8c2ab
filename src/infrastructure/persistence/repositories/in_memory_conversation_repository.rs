use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{AppendedMessage, ConversationRepository, RepositoryError};
use crate::domain::{
    Conversation, ConversationId, ConversationKey, Message, MessageId, ParticipantId,
};

#[derive(Default)]
struct Store {
    conversations: HashMap<ConversationId, Conversation>,
    keys: HashMap<ConversationKey, ConversationId>,
    /// Per conversation, in commit order.
    messages: HashMap<ConversationId, Vec<Message>>,
    message_index: HashMap<MessageId, ConversationId>,
}

impl Store {
    fn message(&self, id: MessageId) -> Option<&Message> {
        let conversation_id = self.message_index.get(&id)?;
        self.messages.get(conversation_id)?.iter().find(|m| m.id == id)
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        let conversation_id = self.message_index.get(&id)?;
        self.messages
            .get_mut(conversation_id)?
            .iter_mut()
            .find(|m| m.id == id)
    }
}

/// Process-local store with the same uniqueness and ordering guarantees as
/// the Postgres repository. One lock guards all state, so every operation is
/// atomic.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    store: Mutex<Store>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut store = self.store.lock().await;
        let key = conversation.key();

        if let Some(existing) = store.keys.get(&key) {
            return store
                .conversations
                .get(existing)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(existing.to_string()));
        }

        if store.conversations.contains_key(&conversation.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate conversation id {}",
                conversation.id
            )));
        }

        store.keys.insert(key, conversation.id);
        store
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation.clone())
    }

    async fn find_by_key(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .keys
            .get(key)
            .and_then(|id| store.conversations.get(id))
            .cloned())
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.conversations.get(&id).cloned())
    }

    async fn list_for_participant(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let store = self.store.lock().await;
        let mut conversations: Vec<Conversation> = store
            .conversations
            .values()
            .filter(|c| c.is_participant(participant))
            .cloned()
            .collect();

        conversations.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(conversations)
    }

    async fn append_message(&self, message: &Message) -> Result<AppendedMessage, RepositoryError> {
        let mut store = self.store.lock().await;
        let conversation_id = message.conversation_id;

        if !store.conversations.contains_key(&conversation_id) {
            return Err(RepositoryError::NotFound(conversation_id.to_string()));
        }
        if store.message_index.contains_key(&message.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate message id {}",
                message.id
            )));
        }

        let thread = store.messages.entry(conversation_id).or_default();
        let mut stored = message.clone();
        stored.is_read = false;
        if let Some(latest) = thread.last() {
            stored.created_at = stored.created_at.max(latest.created_at);
        }
        thread.push(stored.clone());
        store.message_index.insert(stored.id, conversation_id);

        let conversation = store
            .conversations
            .get_mut(&conversation_id)
            .ok_or_else(|| RepositoryError::NotFound(conversation_id.to_string()))?;
        conversation.updated_at = conversation.updated_at.max(stored.created_at);

        Ok(AppendedMessage {
            message: stored,
            conversation: conversation.clone(),
        })
    }

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.message(id).cloned())
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let store = self.store.lock().await;
        let thread = store
            .messages
            .get(&conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = thread.len().saturating_sub(limit);
        Ok(thread[start..].to_vec())
    }

    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Option<Message>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .messages
            .get(&conversation_id)
            .and_then(|thread| thread.last())
            .cloned())
    }

    async fn mark_read(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError> {
        let mut store = self.store.lock().await;
        let mut flipped = 0;

        if let Some(thread) = store.messages.get_mut(&conversation_id) {
            for message in thread.iter_mut().filter(|m| m.is_unread_for(viewer)) {
                message.is_read = true;
                flipped += 1;
            }
        }

        Ok(flipped)
    }

    async fn mark_message_read(
        &self,
        message_id: MessageId,
        viewer: ParticipantId,
    ) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;

        match store.message_mut(message_id) {
            Some(message) if message.is_unread_for(viewer) => {
                message.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_unread(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .messages
            .get(&conversation_id)
            .map(|thread| thread.iter().filter(|m| m.is_unread_for(viewer)).count() as u64)
            .unwrap_or(0))
    }

    async fn count_unread_total(&self, viewer: ParticipantId) -> Result<u64, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .conversations
            .values()
            .filter(|c| c.is_participant(viewer))
            .filter_map(|c| store.messages.get(&c.id))
            .flatten()
            .filter(|m| m.is_unread_for(viewer))
            .count() as u64)
    }
}
