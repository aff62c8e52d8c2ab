use std::sync::Arc;

use tracing::instrument;
use url::Url;

use crate::application::ports::{ChangeEvent, ChangeFeed, ConversationRepository};
use crate::domain::{Actor, ConversationId, Message, MessageId, MessageKind, UnreadBadge};
use crate::infrastructure::observability::redact_payload;

use super::conversation_service::load_participating;
use super::{ConversationSequencer, MessagingError};

/// Message send/receive pipeline and read-state transitions.
///
/// Nothing here retries: a retried send without an idempotency key could
/// insert the message twice, so retrying is left to the caller.
pub struct MessagingService {
    repository: Arc<dyn ConversationRepository>,
    change_feed: Arc<dyn ChangeFeed>,
    sequencer: Arc<ConversationSequencer>,
    max_text_length: usize,
}

impl MessagingService {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        change_feed: Arc<dyn ChangeFeed>,
        sequencer: Arc<ConversationSequencer>,
        max_text_length: usize,
    ) -> Self {
        Self {
            repository,
            change_feed,
            sequencer,
            max_text_length,
        }
    }

    #[instrument(
        skip(self, sender, payload),
        fields(conversation_id = %conversation_id, sender_id = %sender.id, kind = %kind)
    )]
    pub async fn send(
        &self,
        conversation_id: ConversationId,
        sender: &Actor,
        kind: MessageKind,
        payload: &str,
    ) -> Result<Message, MessagingError> {
        let payload = self.validate_payload(kind, payload)?;

        let conversation =
            load_participating(self.repository.as_ref(), sender, conversation_id).await?;

        tracing::debug!(payload = %redact_payload(&payload), "Sending message");

        // Held until both events are out, so publication follows commit order.
        let _permit = self.sequencer.acquire(conversation.id).await;

        let message = Message::new(conversation.id, sender.id, kind, payload);
        let appended = self.repository.append_message(&message).await?;

        tracing::info!(message_id = %appended.message.id, "Message sent");

        self.change_feed.publish(ChangeEvent::MessageInserted {
            conversation: appended.conversation.clone(),
            message: appended.message.clone(),
        });
        self.change_feed
            .publish(ChangeEvent::ConversationUpdated(appended.conversation));

        Ok(appended.message)
    }

    /// Marks everything the other party sent as read. Calling it with nothing
    /// left unread is a no-op.
    #[instrument(skip(self, viewer), fields(conversation_id = %conversation_id, viewer_id = %viewer.id))]
    pub async fn mark_read(
        &self,
        conversation_id: ConversationId,
        viewer: &Actor,
    ) -> Result<u64, MessagingError> {
        load_participating(self.repository.as_ref(), viewer, conversation_id).await?;

        let flipped = self.repository.mark_read(conversation_id, viewer.id).await?;
        if flipped > 0 {
            tracing::debug!(flipped, "Messages marked as read");
        }

        Ok(flipped)
    }

    /// Marks one live-delivered message as read. The sender's own messages
    /// and already-read messages are left untouched.
    #[instrument(skip(self, viewer), fields(message_id = %message_id, viewer_id = %viewer.id))]
    pub async fn mark_message_read(
        &self,
        message_id: MessageId,
        viewer: &Actor,
    ) -> Result<bool, MessagingError> {
        let message = self
            .repository
            .get_message(message_id)
            .await?
            .ok_or_else(|| MessagingError::MessageNotFound(message_id.to_string()))?;

        load_participating(self.repository.as_ref(), viewer, message.conversation_id).await?;

        Ok(self
            .repository
            .mark_message_read(message_id, viewer.id)
            .await?)
    }

    #[instrument(skip(self, viewer), fields(conversation_id = %conversation_id, viewer_id = %viewer.id))]
    pub async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
        viewer: &Actor,
        limit: usize,
    ) -> Result<Vec<Message>, MessagingError> {
        load_participating(self.repository.as_ref(), viewer, conversation_id).await?;

        Ok(self.repository.get_messages(conversation_id, limit).await?)
    }

    pub async fn unread_count(
        &self,
        conversation_id: ConversationId,
        viewer: &Actor,
    ) -> Result<u64, MessagingError> {
        load_participating(self.repository.as_ref(), viewer, conversation_id).await?;

        Ok(self
            .repository
            .count_unread(conversation_id, viewer.id)
            .await?)
    }

    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub async fn total_unread(&self, viewer: &Actor) -> Result<UnreadBadge, MessagingError> {
        let total = self.repository.count_unread_total(viewer.id).await?;
        Ok(UnreadBadge::new(total))
    }

    fn validate_payload(&self, kind: MessageKind, payload: &str) -> Result<String, MessagingError> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(MessagingError::EmptyContent);
        }

        if !kind.is_attachment() {
            if trimmed.chars().count() > self.max_text_length {
                return Err(MessagingError::ContentTooLong {
                    max: self.max_text_length,
                });
            }
            return Ok(trimmed.to_string());
        }

        // Attachments are uploaded by the caller; only http(s) references
        // are accepted, inline data: payloads are not.
        let url = Url::parse(trimmed)
            .map_err(|e| MessagingError::InvalidAttachment(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            other => Err(MessagingError::InvalidAttachment(format!(
                "unsupported scheme: {}",
                other
            ))),
        }
    }
}
