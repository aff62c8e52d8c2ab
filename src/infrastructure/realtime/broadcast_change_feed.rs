use futures::stream::{BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::application::ports::{ChangeEvent, ChangeFeed, FeedItem};

/// In-process change feed over a tokio broadcast channel.
///
/// Publication order is preserved per subscriber. A subscriber that falls
/// more than `capacity` events behind observes [`FeedItem::Lagged`].
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        let conversation_id = event.conversation_id();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::trace!(%conversation_id, receivers, "Change event published");
            }
            Err(_) => {
                tracing::trace!(%conversation_id, "Change event published with no subscribers");
            }
        }
    }

    fn subscribe(&self) -> BoxStream<'static, FeedItem> {
        let mut receiver = self.sender.subscribe();

        async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(event) => yield FeedItem::Event(event),
                    Err(RecvError::Lagged(missed)) => yield FeedItem::Lagged { missed },
                    Err(RecvError::Closed) => break,
                }
            }
        }
        .boxed()
    }
}
