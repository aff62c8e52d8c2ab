use std::sync::Arc;
use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::{PgListener, PgNotification};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::application::ports::{
    ChangeEvent, ChangeFeed, ConversationRepository, FeedItem, RepositoryError,
};
use crate::domain::{ConversationId, MessageId};

/// Channel the `notify_change` row triggers publish on.
pub const CHANGE_CHANNEL: &str = "marketchat_changes";

const RELISTEN_DELAY: Duration = Duration::from_secs(1);

/// Payload of one row-trigger notification. Ids only, so it stays far below
/// the server's notification size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeNotice {
    ConversationCreated {
        conversation_id: Uuid,
    },
    ConversationUpdated {
        conversation_id: Uuid,
    },
    MessageInserted {
        conversation_id: Uuid,
        message_id: Uuid,
    },
}

impl ChangeNotice {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Loads the rows the notice points at. `None` if one of them is gone.
    pub async fn resolve(
        self,
        repository: &dyn ConversationRepository,
    ) -> Result<Option<ChangeEvent>, RepositoryError> {
        match self {
            ChangeNotice::ConversationCreated { conversation_id } => Ok(repository
                .get_conversation(ConversationId::from_uuid(conversation_id))
                .await?
                .map(ChangeEvent::ConversationCreated)),
            ChangeNotice::ConversationUpdated { conversation_id } => Ok(repository
                .get_conversation(ConversationId::from_uuid(conversation_id))
                .await?
                .map(ChangeEvent::ConversationUpdated)),
            ChangeNotice::MessageInserted {
                conversation_id,
                message_id,
            } => {
                let Some(conversation) = repository
                    .get_conversation(ConversationId::from_uuid(conversation_id))
                    .await?
                else {
                    return Ok(None);
                };
                Ok(repository
                    .get_message(MessageId::from_uuid(message_id))
                    .await?
                    .map(|message| ChangeEvent::MessageInserted {
                        conversation,
                        message,
                    }))
            }
        }
    }
}

/// Change feed shared by every instance attached to one database.
///
/// The store's row triggers announce each commit with `NOTIFY`; one listener
/// task per instance re-reads the changed rows and fans them out locally in
/// notification order. [`ChangeFeed::publish`] is therefore a no-op here.
/// A dropped listener connection is surfaced as [`FeedItem::Lagged`].
pub struct PgChangeFeed {
    sender: broadcast::Sender<FeedItem>,
    relay_task: JoinHandle<()>,
}

impl PgChangeFeed {
    pub async fn start(
        pool: &PgPool,
        repository: Arc<dyn ConversationRepository>,
        capacity: usize,
    ) -> Result<Self, RepositoryError> {
        let mut listener = PgListener::connect_with(pool)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let (sender, _) = broadcast::channel(capacity.max(1));
        let relay = NoticeRelay {
            listener,
            repository,
            sender: sender.clone(),
        };
        let relay_task = tokio::spawn(relay.run());

        Ok(Self { sender, relay_task })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Drop for PgChangeFeed {
    fn drop(&mut self) {
        self.relay_task.abort();
    }
}

impl ChangeFeed for PgChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        tracing::trace!(
            conversation_id = %event.conversation_id(),
            "Change event announced by store trigger"
        );
    }

    fn subscribe(&self) -> BoxStream<'static, FeedItem> {
        let mut receiver = self.sender.subscribe();

        async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(item) => yield item,
                    Err(RecvError::Lagged(missed)) => yield FeedItem::Lagged { missed },
                    Err(RecvError::Closed) => break,
                }
            }
        }
        .boxed()
    }
}

struct NoticeRelay {
    listener: PgListener,
    repository: Arc<dyn ConversationRepository>,
    sender: broadcast::Sender<FeedItem>,
}

impl NoticeRelay {
    async fn run(mut self) {
        tracing::info!(channel = CHANGE_CHANNEL, "Change listener started");
        loop {
            match self.listener.try_recv().await {
                Ok(Some(notification)) => self.relay(&notification).await,
                Ok(None) => {
                    // Notifications sent while disconnected are gone.
                    tracing::warn!("Change listener connection lost, reconnecting");
                    self.emit(FeedItem::Lagged { missed: 0 });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Change listener failed to reconnect");
                    tokio::time::sleep(RELISTEN_DELAY).await;
                }
            }
        }
    }

    async fn relay(&self, notification: &PgNotification) {
        let notice = match ChangeNotice::parse(notification.payload()) {
            Ok(notice) => notice,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    payload = notification.payload(),
                    "Ignoring malformed change notice"
                );
                return;
            }
        };

        match notice.resolve(self.repository.as_ref()).await {
            Ok(Some(event)) => self.emit(FeedItem::Event(event)),
            Ok(None) => tracing::warn!(?notice, "Changed row not found"),
            Err(e) => {
                tracing::error!(error = %e, ?notice, "Failed to load changed row");
                self.emit(FeedItem::Lagged { missed: 1 });
            }
        }
    }

    fn emit(&self, item: FeedItem) {
        if self.sender.send(item).is_err() {
            tracing::trace!("Change notice relayed with no subscribers");
        }
    }
}
