use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use marketchat::application::services::ConversationSequencer;
use marketchat::domain::ConversationId;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_many_tasks_on_one_conversation_when_acquiring_then_only_one_holds_at_a_time() {
    let sequencer = Arc::new(ConversationSequencer::new());
    let conversation_id = ConversationId::new();
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let sequencer = Arc::clone(&sequencer);
        let inside = Arc::clone(&inside);
        let max_inside = Arc::clone(&max_inside);
        handles.push(tokio::spawn(async move {
            let _permit = sequencer.acquire(conversation_id).await;
            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
            max_inside.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            inside.fetch_sub(1, Ordering::SeqCst);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    assert_eq!(sequencer.active_slots(), 0);
}

#[tokio::test]
async fn given_different_conversations_when_acquiring_then_permits_do_not_block_each_other() {
    let sequencer = Arc::new(ConversationSequencer::new());

    let first = sequencer.acquire(ConversationId::new()).await;
    let second = tokio::time::timeout(
        Duration::from_millis(200),
        sequencer.acquire(ConversationId::new()),
    )
    .await
    .expect("unrelated conversation was blocked");

    assert_eq!(sequencer.active_slots(), 2);
    drop(first);
    drop(second);
    assert_eq!(sequencer.active_slots(), 0);
}
