use marketchat::domain::{
    Conversation, ConversationKey, ConversationSummary, Message, MessageKind,
};

use crate::helpers::participant;

fn conversation() -> Conversation {
    Conversation::new(ConversationKey::new(participant(), participant(), None).unwrap())
}

#[test]
fn given_no_messages_when_summarizing_then_preview_invites_to_start() {
    let conversation = conversation();
    let summary = ConversationSummary::new(conversation.clone(), None, 0);

    assert_eq!(summary.preview.as_str(), "Start conversation...");
    assert_eq!(summary.last_activity_at, conversation.updated_at);
}

#[test]
fn given_voice_message_when_summarizing_then_preview_is_placeholder() {
    let conversation = conversation();
    let message = Message::new(
        conversation.id,
        conversation.customer_id,
        MessageKind::Voice,
        "https://blobs.example.com/v.ogg?sig=abc".to_string(),
    );

    let summary = ConversationSummary::new(conversation, Some(message.clone()), 1);

    assert_eq!(summary.preview.as_str(), "🎵 Voice message");
    assert_eq!(summary.last_activity_at, message.created_at);
    assert_eq!(summary.unread_count, 1);
}

#[test]
fn given_short_text_when_summarizing_then_preview_is_text() {
    let conversation = conversation();
    let message = Message::new(
        conversation.id,
        conversation.vendor_id,
        MessageKind::Text,
        "  Still available?  ".to_string(),
    );

    let summary = ConversationSummary::new(conversation, Some(message), 0);

    assert_eq!(summary.preview.to_string(), "Still available?");
}
