use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Conversation, ConversationSummary, Message, UnreadBadge};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub product_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Conversation> for ConversationResponse {
    fn from(c: &Conversation) -> Self {
        Self {
            id: c.id.to_string(),
            customer_id: c.customer_id.to_string(),
            vendor_id: c.vendor_id.to_string(),
            product_id: c.product_id.map(|p| p.to_string()),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender: String,
    pub content_type: String,
    pub payload: String,
    pub created_at: String,
    pub read: bool,
}

impl From<&Message> for MessageResponse {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id.to_string(),
            conversation_id: m.conversation_id.to_string(),
            sender: m.sender_id.to_string(),
            content_type: m.kind.as_str().to_string(),
            payload: m.payload.clone(),
            created_at: m.created_at.to_rfc3339(),
            read: m.is_read,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub last_message: Option<MessageResponse>,
    pub preview: String,
    pub last_activity_at: String,
    pub unread_count: u64,
}

impl From<&ConversationSummary> for ConversationSummaryResponse {
    fn from(s: &ConversationSummary) -> Self {
        Self {
            conversation: ConversationResponse::from(&s.conversation),
            last_message: s.last_message.as_ref().map(MessageResponse::from),
            preview: s.preview.to_string(),
            last_activity_at: s.last_activity_at.to_rfc3339(),
            unread_count: s.unread_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadResponse {
    pub unread_count: u64,
    pub badge: String,
}

impl From<UnreadBadge> for UnreadResponse {
    fn from(badge: UnreadBadge) -> Self {
        Self {
            unread_count: badge.count(),
            badge: badge.to_string(),
        }
    }
}

/// Either `counterpartId` (oriented by the caller's role) or an explicit
/// `customerId`/`vendorId` pair.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub counterpart_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub payload: String,
}

fn default_content_type() -> String {
    "text".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub marked: u64,
    pub unread_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkMessageReadResponse {
    pub marked: bool,
}
