use std::sync::Arc;

use crate::application::ports::{ChangeFeed, ConversationRepository};
use crate::application::services::{
    ConversationSequencer, ConversationService, FanOutService, MessagingService,
};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConversationService>,
    pub messaging_service: Arc<MessagingService>,
    pub fan_out_service: Arc<FanOutService>,
    pub settings: Settings,
}

impl AppState {
    /// Wires every service onto one repository and one change feed.
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        change_feed: Arc<dyn ChangeFeed>,
        settings: Settings,
    ) -> Self {
        let sequencer = Arc::new(ConversationSequencer::new());

        Self {
            conversation_service: Arc::new(ConversationService::new(
                Arc::clone(&repository),
                Arc::clone(&change_feed),
                Arc::clone(&sequencer),
            )),
            messaging_service: Arc::new(MessagingService::new(
                Arc::clone(&repository),
                Arc::clone(&change_feed),
                sequencer,
                settings.messaging.max_text_length,
            )),
            fan_out_service: Arc::new(FanOutService::new(repository, change_feed)),
            settings,
        }
    }
}
