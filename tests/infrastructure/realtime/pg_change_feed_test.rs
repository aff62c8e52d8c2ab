use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use uuid::Uuid;

use marketchat::application::ports::{ChangeEvent, ChangeFeed, ConversationRepository, FeedItem};
use marketchat::application::services::{
    ConversationSequencer, ConversationService, MessagingService,
};
use marketchat::domain::{Conversation, ConversationKey, Message, MessageKind};
use marketchat::infrastructure::persistence::{
    InMemoryConversationRepository, PgConversationRepository,
};
use marketchat::infrastructure::realtime::{ChangeNotice, PgChangeFeed};

use crate::helpers::{TEST_MAX_TEXT_LENGTH, TestPostgres, customer_and_vendor, participant};

#[test]
fn given_trigger_payload_when_parsing_then_notice_carries_ids() {
    let conversation_id = Uuid::new_v4();
    let message_id = Uuid::new_v4();
    let payload = format!(
        r#"{{"kind" : "message_inserted", "conversation_id" : "{conversation_id}", "message_id" : "{message_id}"}}"#
    );

    let notice = ChangeNotice::parse(&payload).unwrap();

    assert_eq!(
        notice,
        ChangeNotice::MessageInserted {
            conversation_id,
            message_id
        }
    );
}

#[test]
fn given_unknown_kind_when_parsing_then_rejected() {
    let payload = format!(
        r#"{{"kind" : "message_deleted", "conversation_id" : "{}"}}"#,
        Uuid::new_v4()
    );

    assert!(ChangeNotice::parse(&payload).is_err());
}

#[tokio::test]
async fn given_message_notice_when_resolving_then_event_carries_stored_rows() {
    let repository = InMemoryConversationRepository::new();
    let conversation = repository
        .create_conversation(&Conversation::new(
            ConversationKey::new(participant(), participant(), None).unwrap(),
        ))
        .await
        .unwrap();
    let appended = repository
        .append_message(&Message::new(
            conversation.id,
            conversation.customer_id,
            MessageKind::Text,
            "hello".to_string(),
        ))
        .await
        .unwrap();

    let notice = ChangeNotice::MessageInserted {
        conversation_id: conversation.id.as_uuid(),
        message_id: appended.message.id.as_uuid(),
    };

    match notice.resolve(&repository).await.unwrap() {
        Some(ChangeEvent::MessageInserted {
            conversation: c,
            message,
        }) => {
            assert_eq!(c.id, conversation.id);
            assert_eq!(message.payload, "hello");
        }
        other => panic!("expected message event, got {:?}", other),
    }
}

#[tokio::test]
async fn given_notice_for_missing_row_when_resolving_then_nothing() {
    let repository = InMemoryConversationRepository::new();
    let notice = ChangeNotice::ConversationUpdated {
        conversation_id: Uuid::new_v4(),
    };

    assert!(notice.resolve(&repository).await.unwrap().is_none());
}

async fn next_event(stream: &mut BoxStream<'static, FeedItem>) -> ChangeEvent {
    match tokio::time::timeout(Duration::from_secs(5), stream.next()).await {
        Ok(Some(FeedItem::Event(event))) => event,
        other => panic!("expected change event, got {:?}", other),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_two_instances_on_one_database_when_one_sends_then_the_other_streams_it() {
    let test_pg = TestPostgres::new().await;
    let repository: Arc<dyn ConversationRepository> =
        Arc::new(PgConversationRepository::new(test_pg.pool.clone()));

    let writer_feed: Arc<dyn ChangeFeed> = Arc::new(
        PgChangeFeed::start(&test_pg.pool, Arc::clone(&repository), 64)
            .await
            .unwrap(),
    );
    let reader_feed = PgChangeFeed::start(&test_pg.pool, Arc::clone(&repository), 64)
        .await
        .unwrap();
    let mut stream = reader_feed.subscribe();

    let sequencer = Arc::new(ConversationSequencer::new());
    let conversations = ConversationService::new(
        Arc::clone(&repository),
        Arc::clone(&writer_feed),
        Arc::clone(&sequencer),
    );
    let messages = MessagingService::new(
        Arc::clone(&repository),
        writer_feed,
        sequencer,
        TEST_MAX_TEXT_LENGTH,
    );
    let (customer, vendor) = customer_and_vendor();

    let conversation = conversations
        .resolve_conversation(&customer, customer.id, vendor.id, None)
        .await
        .unwrap();
    let sent = messages
        .send(conversation.id, &customer, MessageKind::Text, "across instances")
        .await
        .unwrap();

    assert!(matches!(
        next_event(&mut stream).await,
        ChangeEvent::ConversationCreated(c) if c.id == conversation.id
    ));
    assert!(matches!(
        next_event(&mut stream).await,
        ChangeEvent::MessageInserted { message, .. } if message.id == sent.id
    ));
    assert!(matches!(
        next_event(&mut stream).await,
        ChangeEvent::ConversationUpdated(c) if c.updated_at >= sent.created_at
    ));
}
