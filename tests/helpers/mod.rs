mod test_postgres;

use std::sync::Arc;

use uuid::Uuid;

use marketchat::application::ports::{ChangeFeed, ConversationRepository};
use marketchat::application::services::{
    ConversationSequencer, ConversationService, FanOutService, MessagingService,
};
use marketchat::domain::{Actor, ParticipantId, ProductId};
use marketchat::infrastructure::persistence::InMemoryConversationRepository;
use marketchat::infrastructure::realtime::BroadcastChangeFeed;

pub use test_postgres::TestPostgres;

pub const TEST_MAX_TEXT_LENGTH: usize = 4000;
pub const TEST_CHANNEL_CAPACITY: usize = 64;

pub fn participant() -> ParticipantId {
    ParticipantId::from_uuid(Uuid::new_v4())
}

pub fn product() -> ProductId {
    ProductId::from_uuid(Uuid::new_v4())
}

/// All services wired onto one in-memory store and one change feed.
pub struct Messaging {
    pub repository: Arc<dyn ConversationRepository>,
    pub change_feed: Arc<BroadcastChangeFeed>,
    pub conversations: Arc<ConversationService>,
    pub messages: Arc<MessagingService>,
    pub fan_out: Arc<FanOutService>,
    pub sequencer: Arc<ConversationSequencer>,
}

impl Messaging {
    pub fn in_memory() -> Self {
        Self::with_capacity(TEST_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let repository: Arc<dyn ConversationRepository> =
            Arc::new(InMemoryConversationRepository::new());
        Self::with_repository(repository, capacity)
    }

    pub fn with_repository(repository: Arc<dyn ConversationRepository>, capacity: usize) -> Self {
        let change_feed = Arc::new(BroadcastChangeFeed::new(capacity));
        let feed: Arc<dyn ChangeFeed> = change_feed.clone();
        let sequencer = Arc::new(ConversationSequencer::new());

        Self {
            conversations: Arc::new(ConversationService::new(
                Arc::clone(&repository),
                Arc::clone(&feed),
                Arc::clone(&sequencer),
            )),
            messages: Arc::new(MessagingService::new(
                Arc::clone(&repository),
                Arc::clone(&feed),
                Arc::clone(&sequencer),
                TEST_MAX_TEXT_LENGTH,
            )),
            fan_out: Arc::new(FanOutService::new(Arc::clone(&repository), feed)),
            repository,
            change_feed,
            sequencer,
        }
    }
}

pub fn customer_and_vendor() -> (Actor, Actor) {
    (Actor::customer(participant()), Actor::vendor(participant()))
}
