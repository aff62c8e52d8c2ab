mod actor;
mod conversation;
mod conversation_id;
mod conversation_key;
mod conversation_summary;
mod message;
mod message_id;
mod message_kind;
mod message_preview;
mod participant_id;
mod product_id;
mod unread_badge;

pub use actor::{Actor, ActorRole};
pub use conversation::Conversation;
pub use conversation_id::ConversationId;
pub use conversation_key::ConversationKey;
pub use conversation_summary::ConversationSummary;
pub use message::Message;
pub use message_id::MessageId;
pub use message_kind::MessageKind;
pub use message_preview::MessagePreview;
pub use participant_id::ParticipantId;
pub use product_id::ProductId;
pub use unread_badge::UnreadBadge;
