use std::sync::Arc;

use crate::application::ports::{ChangeFeed, ConversationRepository, RepositoryError};
use crate::infrastructure::realtime::{BroadcastChangeFeed, PgChangeFeed};
use crate::presentation::config::{Settings, StorageBackend};

use super::create_pool;
use super::repositories::{InMemoryConversationRepository, PgConversationRepository};

/// Conversation store and the change feed that announces its commits.
pub struct Storage {
    pub repository: Arc<dyn ConversationRepository>,
    pub change_feed: Arc<dyn ChangeFeed>,
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(settings: &Settings) -> Result<Storage, RepositoryError> {
        let database = &settings.database;
        let capacity = settings.realtime.channel_capacity;

        match database.backend {
            StorageBackend::Memory => {
                tracing::warn!(
                    "Using in-memory conversation store; data is lost on restart and \
                     events stay within this process"
                );
                Ok(Storage {
                    repository: Arc::new(InMemoryConversationRepository::new()),
                    change_feed: Arc::new(BroadcastChangeFeed::new(capacity)),
                })
            }
            StorageBackend::Postgres => {
                let url = database.url.as_deref().ok_or_else(|| {
                    RepositoryError::ConnectionFailed("database.url required".into())
                })?;
                let pool = create_pool(url, database.max_connections).await?;
                let repository: Arc<dyn ConversationRepository> =
                    Arc::new(PgConversationRepository::new(pool.clone()));
                let change_feed =
                    PgChangeFeed::start(&pool, Arc::clone(&repository), capacity).await?;

                Ok(Storage {
                    repository,
                    change_feed: Arc::new(change_feed),
                })
            }
        }
    }
}
