use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::watch;

use crate::application::ports::{ChangeEvent, FeedItem};
use crate::domain::{ConversationId, ParticipantId};

/// Which change events a subscription receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionScope {
    /// Detail view: every event of one conversation.
    Conversation(ConversationId),
    /// List view: every event of any conversation the participant is in.
    Participant(ParticipantId),
}

impl SubscriptionScope {
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match self {
            SubscriptionScope::Conversation(id) => event.conversation_id() == *id,
            SubscriptionScope::Participant(participant) => event.involves(*participant),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SubscriptionItem {
    Event(ChangeEvent),
    /// Events were dropped; the consumer must re-fetch authoritative state
    /// before trusting the stream again.
    Resync { missed: u64 },
}

/// Releases a [`Subscription`] from outside the task that polls it.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

/// A long-lived, scoped view onto the change feed.
///
/// Delivery is at-least-once and ordered per conversation within one
/// subscription only. After a `Resync` or a reconnect the consumer re-fetches
/// instead of assuming the stream caught up. Dropping the subscription
/// releases it.
pub struct Subscription {
    scope: SubscriptionScope,
    stream: BoxStream<'static, FeedItem>,
    cancelled: watch::Receiver<bool>,
    handle: CancelHandle,
}

impl Subscription {
    pub fn new(scope: SubscriptionScope, stream: BoxStream<'static, FeedItem>) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            scope,
            stream,
            cancelled: rx,
            handle: CancelHandle {
                cancelled: Arc::new(tx),
            },
        }
    }

    pub fn scope(&self) -> SubscriptionScope {
        self.scope
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Waits for the next in-scope item. Returns `None` once cancelled or
    /// when the underlying feed closes.
    pub async fn next(&mut self) -> Option<SubscriptionItem> {
        loop {
            if *self.cancelled.borrow() {
                return None;
            }

            tokio::select! {
                biased;
                changed = self.cancelled.changed() => {
                    if changed.is_err() {
                        return None;
                    }
                }
                item = self.stream.next() => match item {
                    None => return None,
                    Some(FeedItem::Lagged { missed }) => {
                        tracing::warn!(missed, scope = ?self.scope, "Subscriber lagged behind change feed");
                        return Some(SubscriptionItem::Resync { missed });
                    }
                    Some(FeedItem::Event(event)) if self.scope.matches(&event) => {
                        return Some(SubscriptionItem::Event(event));
                    }
                    Some(FeedItem::Event(_)) => {}
                },
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(scope = ?self.scope, "Subscription released");
    }
}
