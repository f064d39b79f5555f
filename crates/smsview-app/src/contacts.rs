// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identity::{Identity, resolve_identity};
use crate::timestamp::{SortKey, sort_key};
use crate::{ConversationKey, Direction, MessageId, MessageRecord, MessageTime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_key: ConversationKey,
    pub display_name: String,
    pub display_phone: String,
    pub last_message_text: String,
    pub last_message_time: MessageTime,
    pub unread_count: usize,
    pub total_message_count: usize,
}

/// A single matching message, listed on its own rather than merged into
/// its conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSearchHit {
    pub conversation_key: ConversationKey,
    pub display_name: String,
    pub display_phone: String,
    pub last_message_text: String,
    pub last_message_time: MessageTime,
    pub unread_count: usize,
    pub total_message_count: usize,
    pub message_id: MessageId,
    pub direction: Option<Direction>,
}

/// What the contact pane shows: either grouped conversations or, while a
/// search term is active, individual message hits. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum ContactListing {
    Conversations(Vec<ConversationSummary>),
    MessageHits(Vec<MessageSearchHit>),
}

impl ContactListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Conversations(entries) => entries.len(),
            Self::MessageHits(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::MessageHits(_))
    }
}

/// Members of one conversation in encounter order.
#[derive(Debug, Clone)]
pub struct ConversationGroup<'a> {
    pub identity: Identity,
    pub members: Vec<&'a MessageRecord>,
}

pub fn is_search_active(term: &str) -> bool {
    !term.trim().is_empty()
}

pub fn contact_listing(messages: &[MessageRecord], search_term: &str) -> ContactListing {
    if is_search_active(search_term) {
        ContactListing::MessageHits(search_messages(messages, search_term))
    } else {
        ContactListing::Conversations(summarize_conversations(messages))
    }
}

/// Partitions messages by conversation key. Groups come out in the order
/// their first member appears; display fields come from that first member.
pub fn group_conversations(messages: &[MessageRecord]) -> Vec<ConversationGroup<'_>> {
    let mut slots: HashMap<ConversationKey, usize> = HashMap::new();
    let mut groups: Vec<ConversationGroup<'_>> = Vec::new();

    for message in messages {
        let identity = resolve_identity(message);
        match slots.get(&identity.key) {
            Some(&slot) => groups[slot].members.push(message),
            None => {
                slots.insert(identity.key.clone(), groups.len());
                groups.push(ConversationGroup {
                    identity,
                    members: vec![message],
                });
            }
        }
    }
    groups
}

pub fn summarize_conversations(messages: &[MessageRecord]) -> Vec<ConversationSummary> {
    let mut ranked: Vec<(SortKey, ConversationSummary)> = group_conversations(messages)
        .into_iter()
        .filter_map(summarize_group)
        .collect();

    // Stable: equal timestamps keep first-appearance order.
    ranked.sort_by(|left, right| right.0.cmp(&left.0));
    ranked.into_iter().map(|(_, summary)| summary).collect()
}

fn summarize_group(group: ConversationGroup<'_>) -> Option<(SortKey, ConversationSummary)> {
    let mut members = group.members.iter();
    let first = *members.next()?;
    let mut latest = (sort_key(first), first);
    for &member in members {
        let key = sort_key(member);
        if key > latest.0 {
            latest = (key, member);
        }
    }

    let (latest_key, latest) = latest;
    let summary = ConversationSummary {
        conversation_key: group.identity.key,
        display_name: group.identity.display_name,
        display_phone: group.identity.display_phone,
        last_message_text: latest.message.clone(),
        last_message_time: latest.time.clone(),
        unread_count: group
            .members
            .iter()
            .filter(|member| member.status.is_unread())
            .count(),
        total_message_count: group.members.len(),
    };
    Some((latest_key, summary))
}

/// Matches the term (as typed) case-insensitively against message text and
/// display name, and literally against the display phone. Inactive terms
/// return no hits.
pub fn search_messages(messages: &[MessageRecord], term: &str) -> Vec<MessageSearchHit> {
    if !is_search_active(term) {
        return Vec::new();
    }
    let needle = term.to_lowercase();

    let mut ranked: Vec<(SortKey, MessageSearchHit)> = messages
        .iter()
        .filter_map(|message| {
            let identity = resolve_identity(message);
            let matched = message.message.to_lowercase().contains(&needle)
                || identity.display_name.to_lowercase().contains(&needle)
                || identity.display_phone.contains(term);
            matched.then(|| (sort_key(message), search_hit(message, identity)))
        })
        .collect();

    ranked.sort_by(|left, right| right.0.cmp(&left.0));
    ranked.into_iter().map(|(_, hit)| hit).collect()
}

fn search_hit(message: &MessageRecord, identity: Identity) -> MessageSearchHit {
    MessageSearchHit {
        conversation_key: identity.key,
        display_name: identity.display_name,
        display_phone: identity.display_phone,
        last_message_text: message.message.clone(),
        last_message_time: message.time.clone(),
        unread_count: usize::from(message.status.is_unread()),
        total_message_count: 1,
        message_id: message.id.clone(),
        direction: message.party.direction,
    }
}
