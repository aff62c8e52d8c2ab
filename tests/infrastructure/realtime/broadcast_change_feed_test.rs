use futures::StreamExt;

use marketchat::application::ports::{ChangeEvent, ChangeFeed, FeedItem};
use marketchat::domain::{Conversation, ConversationKey};
use marketchat::infrastructure::realtime::BroadcastChangeFeed;

use crate::helpers::participant;

fn conversation() -> Conversation {
    Conversation::new(ConversationKey::new(participant(), participant(), None).unwrap())
}

#[tokio::test]
async fn given_two_subscribers_when_publishing_then_both_receive_event() {
    let feed = BroadcastChangeFeed::new(8);
    let mut first = feed.subscribe();
    let mut second = feed.subscribe();
    let created = conversation();

    feed.publish(ChangeEvent::ConversationCreated(created.clone()));

    for stream in [&mut first, &mut second] {
        match stream.next().await {
            Some(FeedItem::Event(event)) => assert_eq!(event.conversation_id(), created.id),
            other => panic!("expected event, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn given_no_subscribers_when_publishing_then_event_is_dropped_silently() {
    let feed = BroadcastChangeFeed::new(8);
    feed.publish(ChangeEvent::ConversationCreated(conversation()));
    assert_eq!(feed.subscriber_count(), 0);
}

#[tokio::test]
async fn given_full_buffer_when_subscriber_reads_then_lag_is_reported() {
    let feed = BroadcastChangeFeed::new(1);
    let mut stream = feed.subscribe();

    for _ in 0..3 {
        feed.publish(ChangeEvent::ConversationUpdated(conversation()));
    }

    assert!(matches!(
        stream.next().await,
        Some(FeedItem::Lagged { missed: 2 })
    ));
    assert!(matches!(stream.next().await, Some(FeedItem::Event(_))));
}
