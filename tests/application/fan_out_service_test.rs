use std::time::Duration;

use marketchat::application::ports::ChangeEvent;
use marketchat::application::services::{MessagingError, Subscription, SubscriptionItem};
use marketchat::domain::{Actor, MessageKind};

use crate::helpers::{Messaging, customer_and_vendor, participant};

async fn next_item(subscription: &mut Subscription) -> Option<SubscriptionItem> {
    tokio::time::timeout(Duration::from_secs(2), subscription.next())
        .await
        .expect("subscription did not yield in time")
}

#[tokio::test]
async fn given_detail_subscription_when_counterpart_sends_then_message_is_delivered() {
    let messaging = Messaging::in_memory();
    let (alice, bob_shop) = customer_and_vendor();
    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();

    let mut subscription = messaging
        .fan_out
        .subscribe_conversation(conversation.id, &bob_shop)
        .await
        .unwrap();

    let sent = messaging
        .messages
        .send(conversation.id, &alice, MessageKind::Text, "hello")
        .await
        .unwrap();

    match next_item(&mut subscription).await {
        Some(SubscriptionItem::Event(ChangeEvent::MessageInserted { message, .. })) => {
            assert_eq!(message.id, sent.id);
        }
        other => panic!("expected message event, got {:?}", other),
    }
    assert!(matches!(
        next_item(&mut subscription).await,
        Some(SubscriptionItem::Event(ChangeEvent::ConversationUpdated(_)))
    ));
}

#[tokio::test]
async fn given_detail_subscription_when_other_conversation_changes_then_event_is_filtered() {
    let messaging = Messaging::in_memory();
    let (alice, bob_shop) = customer_and_vendor();
    let watched = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();
    let other = messaging
        .conversations
        .start_conversation(&alice, participant(), None)
        .await
        .unwrap();

    let mut subscription = messaging
        .fan_out
        .subscribe_conversation(watched.id, &alice)
        .await
        .unwrap();

    messaging
        .messages
        .send(other.id, &alice, MessageKind::Text, "elsewhere")
        .await
        .unwrap();
    let here = messaging
        .messages
        .send(watched.id, &bob_shop, MessageKind::Text, "here")
        .await
        .unwrap();

    match next_item(&mut subscription).await {
        Some(SubscriptionItem::Event(ChangeEvent::MessageInserted { message, .. })) => {
            assert_eq!(message.id, here.id);
        }
        other => panic!("expected message event, got {:?}", other),
    }
}

#[tokio::test]
async fn given_messages_committed_in_order_when_streamed_then_delivered_in_same_order() {
    let messaging = Messaging::in_memory();
    let (alice, bob_shop) = customer_and_vendor();
    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();
    let mut subscription = messaging
        .fan_out
        .subscribe_conversation(conversation.id, &bob_shop)
        .await
        .unwrap();

    let mut sent = Vec::new();
    for i in 0..5 {
        let message = messaging
            .messages
            .send(conversation.id, &alice, MessageKind::Text, &format!("m{}", i))
            .await
            .unwrap();
        sent.push(message.id);
    }

    let mut delivered = Vec::new();
    while delivered.len() < sent.len() {
        if let Some(SubscriptionItem::Event(ChangeEvent::MessageInserted { message, .. })) =
            next_item(&mut subscription).await
        {
            delivered.push(message.id);
        }
    }

    assert_eq!(delivered, sent);
}

#[tokio::test]
async fn given_inbox_subscription_when_new_conversation_is_created_then_it_is_delivered() {
    let messaging = Messaging::in_memory();
    let (alice, bob_shop) = customer_and_vendor();
    let mut inbox = messaging.fan_out.subscribe_inbox(&bob_shop);

    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();

    match next_item(&mut inbox).await {
        Some(SubscriptionItem::Event(ChangeEvent::ConversationCreated(created))) => {
            assert_eq!(created.id, conversation.id);
        }
        other => panic!("expected conversation event, got {:?}", other),
    }
}

#[tokio::test]
async fn given_outsider_when_subscribing_to_conversation_then_not_a_participant() {
    let messaging = Messaging::in_memory();
    let (alice, bob_shop) = customer_and_vendor();
    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();

    let result = messaging
        .fan_out
        .subscribe_conversation(conversation.id, &Actor::customer(participant()))
        .await;

    assert!(matches!(result, Err(MessagingError::NotAParticipant)));
}

#[tokio::test]
async fn given_waiting_subscription_when_cancelled_elsewhere_then_next_returns_none() {
    let messaging = Messaging::in_memory();
    let (_, bob_shop) = customer_and_vendor();
    let mut inbox = messaging.fan_out.subscribe_inbox(&bob_shop);
    let handle = inbox.cancel_handle();

    let waiter = tokio::spawn(async move { inbox.next().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("cancel did not release the subscription")
        .unwrap();

    assert!(result.is_none());
    assert!(handle.is_cancelled());
}

#[tokio::test]
async fn given_released_subscriptions_when_counting_then_feed_has_no_receivers() {
    let messaging = Messaging::in_memory();
    let (alice, _) = customer_and_vendor();

    let first = messaging.fan_out.subscribe_inbox(&alice);
    let second = messaging.fan_out.subscribe_inbox(&alice);
    assert_eq!(messaging.change_feed.subscriber_count(), 2);

    drop(first);
    drop(second);
    assert_eq!(messaging.change_feed.subscriber_count(), 0);
}

#[tokio::test]
async fn given_slow_subscriber_when_feed_overflows_then_resync_is_signalled() {
    let messaging = Messaging::with_capacity(2);
    let (alice, bob_shop) = customer_and_vendor();
    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();
    let mut subscription = messaging
        .fan_out
        .subscribe_conversation(conversation.id, &bob_shop)
        .await
        .unwrap();

    for i in 0..5 {
        messaging
            .messages
            .send(conversation.id, &alice, MessageKind::Text, &format!("m{}", i))
            .await
            .unwrap();
    }

    match next_item(&mut subscription).await {
        Some(SubscriptionItem::Resync { missed }) => assert!(missed > 0),
        other => panic!("expected resync, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_senders_when_streamed_then_delivery_order_matches_commit_order() {
    const SENDERS: usize = 8;
    const PER_SENDER: usize = 25;

    let messaging = Messaging::with_capacity(4 * SENDERS * PER_SENDER);
    let (alice, bob_shop) = customer_and_vendor();
    let conversation = messaging
        .conversations
        .start_conversation(&alice, bob_shop.id, None)
        .await
        .unwrap();
    let mut subscription = messaging
        .fan_out
        .subscribe_conversation(conversation.id, &bob_shop)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for task in 0..SENDERS {
        let service = messaging.messages.clone();
        let sender = if task % 2 == 0 { alice } else { bob_shop };
        let conversation_id = conversation.id;
        handles.push(tokio::spawn(async move {
            for i in 0..PER_SENDER {
                service
                    .send(conversation_id, &sender, MessageKind::Text, &format!("{task}-{i}"))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut delivered = Vec::new();
    while delivered.len() < SENDERS * PER_SENDER {
        match next_item(&mut subscription).await {
            Some(SubscriptionItem::Event(ChangeEvent::MessageInserted { message, .. })) => {
                delivered.push(message.id);
            }
            Some(SubscriptionItem::Resync { missed }) => panic!("lagged by {}", missed),
            _ => {}
        }
    }

    let committed: Vec<_> = messaging
        .messages
        .fetch_messages(conversation.id, &alice, SENDERS * PER_SENDER)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(delivered, committed);
    assert_eq!(messaging.sequencer.active_slots(), 0);
}
