use chrono::{DateTime, Utc};

use super::{ConversationId, ConversationKey, ParticipantId, ProductId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub customer_id: ParticipantId,
    pub vendor_id: ParticipantId,
    pub product_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(key: ConversationKey) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            customer_id: key.customer_id,
            vendor_id: key.vendor_id,
            product_id: key.product_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey {
            customer_id: self.customer_id,
            vendor_id: self.vendor_id,
            product_id: self.product_id,
        }
    }

    pub fn is_participant(&self, participant: ParticipantId) -> bool {
        self.customer_id == participant || self.vendor_id == participant
    }

    /// The other party of the conversation, if `participant` is one of them.
    pub fn counterpart_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        if participant == self.customer_id {
            Some(self.vendor_id)
        } else if participant == self.vendor_id {
            Some(self.customer_id)
        } else {
            None
        }
    }
}
