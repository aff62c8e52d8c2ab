mod api_error;
mod conversations;
pub mod dto;
mod events;
mod health;
mod ids;
mod messages;
mod unread;

pub use api_error::{ApiError, ErrorResponse};
pub use conversations::{
    get_conversation_handler, list_conversations_handler, start_conversation_handler,
};
pub use events::{conversation_events_handler, inbox_events_handler};
pub use health::{HealthResponse, health_handler};
pub use messages::{
    list_messages_handler, mark_message_read_handler, mark_read_handler, send_message_handler,
};
pub use unread::{conversation_unread_handler, total_unread_handler};
