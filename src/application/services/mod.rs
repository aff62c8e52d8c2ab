mod conversation_sequencer;
mod conversation_service;
mod fan_out_service;
mod message_timeline;
mod messaging_error;
mod messaging_service;
mod subscription;

pub use conversation_sequencer::{ConversationSequencer, SequencerPermit};
pub use conversation_service::ConversationService;
pub use fan_out_service::FanOutService;
pub use message_timeline::MessageTimeline;
pub use messaging_error::MessagingError;
pub use messaging_service::MessagingService;
pub use subscription::{CancelHandle, Subscription, SubscriptionItem, SubscriptionScope};
