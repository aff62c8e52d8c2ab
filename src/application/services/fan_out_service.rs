use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{ChangeFeed, ConversationRepository};
use crate::domain::{Actor, ConversationId};

use super::conversation_service::load_participating;
use super::{MessagingError, Subscription, SubscriptionScope};

/// Hands out scoped subscriptions to the change feed.
pub struct FanOutService {
    repository: Arc<dyn ConversationRepository>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl FanOutService {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        change_feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            repository,
            change_feed,
        }
    }

    /// Detail-view subscription. Only participants may listen.
    #[instrument(skip(self, viewer), fields(conversation_id = %conversation_id, viewer_id = %viewer.id))]
    pub async fn subscribe_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: &Actor,
    ) -> Result<Subscription, MessagingError> {
        load_participating(self.repository.as_ref(), viewer, conversation_id).await?;

        tracing::debug!("Conversation subscription opened");
        Ok(Subscription::new(
            SubscriptionScope::Conversation(conversation_id),
            self.change_feed.subscribe(),
        ))
    }

    /// List-view subscription covering every conversation of the viewer,
    /// including ones created after subscribing.
    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub fn subscribe_inbox(&self, viewer: &Actor) -> Subscription {
        tracing::debug!("Inbox subscription opened");
        Subscription::new(
            SubscriptionScope::Participant(viewer.id),
            self.change_feed.subscribe(),
        )
    }
}
