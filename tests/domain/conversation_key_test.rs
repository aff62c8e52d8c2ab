use uuid::Uuid;

use marketchat::domain::{Conversation, ConversationKey, ParticipantId};

use crate::helpers::{participant, product};

#[test]
fn given_same_participant_on_both_sides_when_building_key_then_rejected() {
    let someone = participant();
    assert!(ConversationKey::new(someone, someone, None).is_none());
}

#[test]
fn given_nil_participant_when_building_key_then_rejected() {
    let nil = ParticipantId::from_uuid(Uuid::nil());
    assert!(ConversationKey::new(nil, participant(), None).is_none());
    assert!(ConversationKey::new(participant(), nil, None).is_none());
}

#[test]
fn given_keys_with_and_without_product_when_compared_then_distinct() {
    let (customer, vendor) = (participant(), participant());

    let general = ConversationKey::new(customer, vendor, None).unwrap();
    let about_product = ConversationKey::new(customer, vendor, Some(product())).unwrap();

    assert_ne!(general, about_product);
    assert_eq!(general, ConversationKey::new(customer, vendor, None).unwrap());
}

#[test]
fn given_conversation_when_asking_counterpart_then_returns_other_side() {
    let (customer, vendor) = (participant(), participant());
    let conversation = Conversation::new(ConversationKey::new(customer, vendor, None).unwrap());

    assert_eq!(conversation.counterpart_of(customer), Some(vendor));
    assert_eq!(conversation.counterpart_of(vendor), Some(customer));
    assert_eq!(conversation.counterpart_of(participant()), None);
}
