use super::{ParticipantId, ProductId};

/// The (customer, vendor, product?) triple a conversation is unique on.
///
/// An absent product is a value of its own: `(c, v, None)` and
/// `(c, v, Some(p))` are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub customer_id: ParticipantId,
    pub vendor_id: ParticipantId,
    pub product_id: Option<ProductId>,
}

impl ConversationKey {
    /// Returns `None` for a self-referential or nil participant pair.
    pub fn new(
        customer_id: ParticipantId,
        vendor_id: ParticipantId,
        product_id: Option<ProductId>,
    ) -> Option<Self> {
        if customer_id.is_nil() || vendor_id.is_nil() || customer_id == vendor_id {
            return None;
        }

        Some(Self {
            customer_id,
            vendor_id,
            product_id,
        })
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.customer_id == participant || self.vendor_id == participant
    }
}
