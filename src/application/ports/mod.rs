mod change_feed;
mod conversation_repository;
mod repository_error;

pub use change_feed::{ChangeEvent, ChangeFeed, FeedItem};
pub use conversation_repository::{AppendedMessage, ConversationRepository};
pub use repository_error::RepositoryError;
