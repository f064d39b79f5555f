// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use smsview_app::timestamp::sort_key;
use smsview_app::{
    AppCommand, AppState, ContactListing, ConversationKey, MessageId, MessageRecord, ThreadQuery,
    WINDOW_STEP, get_thread, group_conversations, normalize, resolve, search_messages,
    summarize_conversations,
};
use smsview_testkit::{ExportFaker, sample_export};
use std::collections::{BTreeMap, BTreeSet};

fn faked(seed: u64, contacts: usize, messages: usize) -> Vec<MessageRecord> {
    normalize(&ExportFaker::new(seed).export(contacts, messages))
}

#[test]
fn sample_export_summarizes_to_one_conversation() {
    let messages = normalize(&sample_export());
    let summaries = summarize_conversations(&messages);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].conversation_key, ConversationKey::from("555"));
    assert_eq!(summaries[0].total_message_count, 2);
    assert_eq!(summaries[0].unread_count, 1);
    assert_eq!(summaries[0].last_message_text, "hey there");
}

#[test]
fn sample_export_search_and_thread_examples() {
    let messages = normalize(&sample_export());

    let hits = search_messages(&messages, "hey");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].message_id, MessageId::from("2"));

    let key = ConversationKey::from("555");
    let window = get_thread(
        &messages,
        &ThreadQuery {
            window_size: 1,
            ..ThreadQuery::new(&key)
        },
    );
    assert_eq!(window.messages.len(), 1);
    assert_eq!(window.messages[0].id, MessageId::from("1"));
    assert!(window.has_more);
    assert_eq!(window.total_count, 2);

    let target = MessageId::from("2");
    let jumped = get_thread(
        &messages,
        &ThreadQuery {
            window_size: 1,
            jump_target: Some(&target),
            ..ThreadQuery::new(&key)
        },
    );
    assert_eq!(jumped.messages.len(), 2);
}

#[test]
fn conversations_partition_every_message_exactly_once() {
    for seed in 0_u64..40_u64 {
        let messages = faked(seed, 8, 120);
        let groups = group_conversations(&messages);

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for group in &groups {
            for member in &group.members {
                assert_eq!(resolve(member), group.identity.key, "seed {seed}");
                *seen.entry(member.id.as_str()).or_default() += 1;
            }
        }
        assert_eq!(seen.len(), messages.len(), "seed {seed}");
        assert!(seen.values().all(|count| *count == 1), "seed {seed}");

        let summaries = summarize_conversations(&messages);
        let total: usize = summaries.iter().map(|s| s.total_message_count).sum();
        assert_eq!(total, messages.len(), "seed {seed}");

        let keys: BTreeSet<_> = summaries.iter().map(|s| &s.conversation_key).collect();
        assert_eq!(keys.len(), summaries.len(), "seed {seed}");
    }
}

#[test]
fn keys_follow_identity_priority() {
    for seed in 0_u64..20_u64 {
        let messages = faked(seed, 10, 80);
        for left in &messages {
            for right in &messages {
                let left_phone = left.party.phone.as_deref().map(str::trim).unwrap_or("");
                let right_phone = right.party.phone.as_deref().map(str::trim).unwrap_or("");
                let same_key = resolve(left) == resolve(right);

                if !left_phone.is_empty() && left_phone == right_phone {
                    assert!(same_key, "seed {seed}: shared phone must share key");
                }
                if left_phone.is_empty() != right_phone.is_empty() {
                    assert!(!same_key, "seed {seed}: phone and phoneless never merge");
                }
            }
        }
    }
}

#[test]
fn listings_sort_newest_first_and_threads_oldest_first() {
    for seed in 0_u64..30_u64 {
        let messages = faked(seed, 6, 90);

        let summaries = summarize_conversations(&messages);
        for pair in summaries.windows(2) {
            let newer = smsview_app::timestamp::parse_timestamp(&pair[0].last_message_time);
            let older = smsview_app::timestamp::parse_timestamp(&pair[1].last_message_time);
            assert!(newer >= older, "seed {seed}");
        }

        let hits = search_messages(&messages, "e");
        for pair in hits.windows(2) {
            let newer = smsview_app::timestamp::parse_timestamp(&pair[0].last_message_time);
            let older = smsview_app::timestamp::parse_timestamp(&pair[1].last_message_time);
            assert!(newer >= older, "seed {seed}");
        }

        for summary in &summaries {
            let window = get_thread(&messages, &ThreadQuery::new(&summary.conversation_key));
            for pair in window.messages.windows(2) {
                assert!(sort_key(&pair[0]) <= sort_key(&pair[1]), "seed {seed}");
            }
        }
    }
}

#[test]
fn growing_the_window_extends_the_prefix() {
    for seed in 0_u64..20_u64 {
        let messages = faked(seed, 2, 260);
        for summary in summarize_conversations(&messages) {
            let key = &summary.conversation_key;
            let mut previous = get_thread(&messages, &ThreadQuery::new(key));
            for step in 1..4 {
                let next = get_thread(
                    &messages,
                    &ThreadQuery {
                        window_size: previous.window_size + WINDOW_STEP,
                        ..ThreadQuery::new(key)
                    },
                );
                assert!(next.messages.len() >= previous.messages.len());
                assert_eq!(
                    &next.messages[..previous.messages.len()],
                    previous.messages.as_slice(),
                    "seed {seed} step {step}"
                );
                previous = next;
            }
        }
    }
}

#[test]
fn jump_target_is_always_visible() {
    for seed in 0_u64..20_u64 {
        let messages = faked(seed, 3, 200);
        for message in &messages {
            let key = resolve(message);
            for window_size in [1, 5, 50] {
                let window = get_thread(
                    &messages,
                    &ThreadQuery {
                        window_size,
                        jump_target: Some(&message.id),
                        ..ThreadQuery::new(&key)
                    },
                );
                assert!(window.contains(&message.id), "seed {seed} id {}", message.id);
            }
        }
    }
}

#[test]
fn thread_search_never_changes_totals() {
    for seed in 0_u64..20_u64 {
        let messages = faked(seed, 3, 150);
        for summary in summarize_conversations(&messages) {
            let key = &summary.conversation_key;
            let plain = get_thread(&messages, &ThreadQuery::new(key));
            let filtered = get_thread(
                &messages,
                &ThreadQuery {
                    search_term: "coffee",
                    ..ThreadQuery::new(key)
                },
            );
            assert_eq!(plain.total_count, summary.total_message_count);
            assert_eq!(filtered.total_count, plain.total_count);
            assert_eq!(filtered.has_more, plain.has_more);
            assert!(
                filtered
                    .messages
                    .iter()
                    .all(|m| m.message.to_lowercase().contains("coffee"))
            );
        }
    }
}

#[test]
fn derivations_are_deterministic() {
    let messages = faked(99, 10, 300);
    assert_eq!(
        summarize_conversations(&messages),
        summarize_conversations(&messages)
    );
    assert_eq!(
        search_messages(&messages, "you"),
        search_messages(&messages, "you")
    );
}

#[test]
fn state_drives_listing_and_thread_from_one_snapshot() {
    let mut state = AppState::default();
    state.dispatch(AppCommand::SetMessages(normalize(
        &ExportFaker::new(5).wrapped_export(4, 70),
    )));
    assert_eq!(state.messages.len(), 70);

    let ContactListing::Conversations(summaries) = state.contact_listing() else {
        panic!("no search term means grouped conversations");
    };
    let first = summaries[0].conversation_key.clone();
    state.dispatch(AppCommand::SelectConversation {
        key: first.clone(),
        jump_target: None,
    });
    let thread = state.thread().expect("selected conversation has a thread");
    assert_eq!(thread.total_count, summaries[0].total_message_count);
    assert!(thread.messages.iter().all(|m| resolve(m) == first));
}
