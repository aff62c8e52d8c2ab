use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{ChangeEvent, ChangeFeed, ConversationRepository};
use crate::domain::{
    Actor, ActorRole, Conversation, ConversationId, ConversationKey, ConversationSummary,
    ParticipantId, ProductId,
};

use super::{ConversationSequencer, MessagingError};

/// Conversation identity: dedup on the (customer, vendor, product?) triple
/// and the per-viewer conversation list.
pub struct ConversationService {
    repository: Arc<dyn ConversationRepository>,
    change_feed: Arc<dyn ChangeFeed>,
    sequencer: Arc<ConversationSequencer>,
}

impl ConversationService {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        change_feed: Arc<dyn ChangeFeed>,
        sequencer: Arc<ConversationSequencer>,
    ) -> Self {
        Self {
            repository,
            change_feed,
            sequencer,
        }
    }

    /// Returns the conversation for the triple, creating it on first contact.
    ///
    /// Concurrent calls for one triple all observe the same conversation: the
    /// store's uniqueness constraint decides the winner and losers re-read.
    #[instrument(
        skip(self, actor),
        fields(actor_id = %actor.id, customer_id = %customer_id, vendor_id = %vendor_id)
    )]
    pub async fn resolve_conversation(
        &self,
        actor: &Actor,
        customer_id: ParticipantId,
        vendor_id: ParticipantId,
        product_id: Option<ProductId>,
    ) -> Result<Conversation, MessagingError> {
        let key = ConversationKey::new(customer_id, vendor_id, product_id).ok_or_else(|| {
            MessagingError::InvalidParticipants(
                "customer and vendor must be distinct, non-empty ids".to_string(),
            )
        })?;

        if !key.involves(actor.id) {
            tracing::warn!("Actor tried to open a conversation it is not part of");
            return Err(MessagingError::NotAParticipant);
        }

        if let Some(existing) = self.repository.find_by_key(&key).await? {
            tracing::debug!(conversation_id = %existing.id, "Resolved existing conversation");
            return Ok(existing);
        }

        let candidate = Conversation::new(key);
        let _permit = self.sequencer.acquire(candidate.id).await;
        let stored = self.repository.create_conversation(&candidate).await?;

        if stored.id == candidate.id {
            tracing::info!(conversation_id = %stored.id, "Conversation created");
            self.change_feed
                .publish(ChangeEvent::ConversationCreated(stored.clone()));
        } else {
            tracing::debug!(
                conversation_id = %stored.id,
                "Lost creation race, using concurrently created conversation"
            );
        }

        Ok(stored)
    }

    /// Role-aware entry point: the actor names only the other party.
    pub async fn start_conversation(
        &self,
        actor: &Actor,
        counterpart_id: ParticipantId,
        product_id: Option<ProductId>,
    ) -> Result<Conversation, MessagingError> {
        let (customer_id, vendor_id) = match actor.role {
            ActorRole::Customer => (actor.id, counterpart_id),
            ActorRole::Vendor => (counterpart_id, actor.id),
        };

        self.resolve_conversation(actor, customer_id, vendor_id, product_id)
            .await
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id, conversation_id = %id))]
    pub async fn get_conversation(
        &self,
        actor: &Actor,
        id: ConversationId,
    ) -> Result<Conversation, MessagingError> {
        load_participating(self.repository.as_ref(), actor, id).await
    }

    /// The viewer's conversations, most recently active first, with preview
    /// and unread count recomputed from the store.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn list_conversations(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ConversationSummary>, MessagingError> {
        let conversations = self.repository.list_for_participant(actor.id).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let last_message = self.repository.last_message(conversation.id).await?;
            let unread_count = self
                .repository
                .count_unread(conversation.id, actor.id)
                .await?;
            summaries.push(ConversationSummary::new(
                conversation,
                last_message,
                unread_count,
            ));
        }

        tracing::debug!(count = summaries.len(), "Listed conversations");
        Ok(summaries)
    }
}

/// Loads a conversation and checks that `actor` takes part in it.
pub(crate) async fn load_participating(
    repository: &dyn ConversationRepository,
    actor: &Actor,
    id: ConversationId,
) -> Result<Conversation, MessagingError> {
    let conversation = repository
        .get_conversation(id)
        .await?
        .ok_or_else(|| MessagingError::ConversationNotFound(id.to_string()))?;

    if !conversation.is_participant(actor.id) {
        return Err(MessagingError::NotAParticipant);
    }

    Ok(conversation)
}
