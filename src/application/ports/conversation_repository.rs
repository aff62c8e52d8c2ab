use async_trait::async_trait;

use crate::domain::{
    Conversation, ConversationId, ConversationKey, Message, MessageId, ParticipantId,
};

use super::RepositoryError;

/// A message as committed by the store together with its touched conversation.
#[derive(Debug, Clone)]
pub struct AppendedMessage {
    pub message: Message,
    pub conversation: Conversation,
}

/// Durable storage of conversations and their messages.
///
/// Implementations enforce uniqueness of [`ConversationKey`] and commit
/// messages of one conversation in non-decreasing `created_at` order.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Inserts `conversation` unless one with the same key exists, and
    /// returns whichever conversation is stored for that key afterwards.
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError>;

    async fn find_by_key(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, RepositoryError>;

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Conversations `participant` is customer or vendor of, most recently
    /// updated first.
    async fn list_for_participant(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Conversation>, RepositoryError>;

    /// Inserts the message and bumps the owning conversation's `updated_at`.
    ///
    /// The stored `created_at` may be moved forward so it never precedes a
    /// message already committed to the same conversation.
    async fn append_message(&self, message: &Message) -> Result<AppendedMessage, RepositoryError>;

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, RepositoryError>;

    /// The most recent `limit` messages, oldest first.
    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError>;

    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Option<Message>, RepositoryError>;

    /// Flags every unread message not sent by `viewer` as read and returns
    /// how many flipped.
    async fn mark_read(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError>;

    /// Flags a single message as read when `viewer` is not its sender.
    /// Returns whether the flag flipped.
    async fn mark_message_read(
        &self,
        message_id: MessageId,
        viewer: ParticipantId,
    ) -> Result<bool, RepositoryError>;

    async fn count_unread(
        &self,
        conversation_id: ConversationId,
        viewer: ParticipantId,
    ) -> Result<u64, RepositoryError>;

    /// Unread messages across every conversation `viewer` takes part in.
    async fn count_unread_total(&self, viewer: ParticipantId) -> Result<u64, RepositoryError>;
}
