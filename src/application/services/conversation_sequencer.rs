use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::ConversationId;

/// Per-conversation critical section spanning a store commit and the change
/// events it publishes, so subscribers see events in commit order.
///
/// Slots are created on demand and removed once nobody holds or waits on
/// them.
#[derive(Default)]
pub struct ConversationSequencer {
    slots: Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>,
}

impl ConversationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(self: &Arc<Self>, conversation_id: ConversationId) -> SequencerPermit {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(conversation_id).or_default())
        };

        let guard = Arc::clone(&slot).lock_owned().await;

        SequencerPermit {
            sequencer: Arc::clone(self),
            conversation_id,
            slot,
            guard: Some(guard),
        }
    }

    /// Conversations with a live slot.
    pub fn active_slots(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held while a conversation's commit and publish run; released on drop.
pub struct SequencerPermit {
    sequencer: Arc<ConversationSequencer>,
    conversation_id: ConversationId,
    slot: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SequencerPermit {
    fn drop(&mut self) {
        let mut slots = self
            .sequencer
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.guard.take();

        // Map entry, `self.slot`, and nothing else: no holder and no waiter.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.conversation_id);
        }
    }
}
