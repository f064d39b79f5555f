// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::identity::resolve;
use crate::timestamp::{SortKey, sort_key};
use crate::{ConversationKey, MessageId, MessageRecord};

pub const INITIAL_WINDOW: usize = 50;
pub const WINDOW_STEP: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadQuery<'a> {
    pub conversation: &'a ConversationKey,
    pub search_term: &'a str,
    pub window_size: usize,
    pub jump_target: Option<&'a MessageId>,
}

impl<'a> ThreadQuery<'a> {
    pub fn new(conversation: &'a ConversationKey) -> Self {
        Self {
            conversation,
            search_term: "",
            window_size: INITIAL_WINDOW,
            jump_target: None,
        }
    }
}

/// Oldest-first prefix of a conversation.
///
/// `total_count` and `has_more` describe the whole conversation and ignore
/// the in-thread search filter, so "N remaining" keeps counting the full
/// thread while a filter narrows what is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadWindow {
    pub messages: Vec<MessageRecord>,
    pub total_count: usize,
    pub has_more: bool,
    pub window_size: usize,
    /// True when the window was stretched past `window_size` to reach the
    /// jump target.
    pub jump_applied: bool,
}

impl ThreadWindow {
    pub fn remaining(&self) -> usize {
        self.total_count.saturating_sub(self.window_size)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|message| &message.id == id)
    }
}

pub fn get_thread(messages: &[MessageRecord], query: &ThreadQuery<'_>) -> ThreadWindow {
    let members: Vec<&MessageRecord> = messages
        .iter()
        .filter(|message| &resolve(message) == query.conversation)
        .collect();
    let total_count = members.len();

    let needle = query.search_term.to_lowercase();
    let mut ordered: Vec<(SortKey, &MessageRecord)> = members
        .into_iter()
        .filter(|message| needle.is_empty() || message.message.to_lowercase().contains(&needle))
        .map(|message| (sort_key(message), message))
        .collect();
    ordered.sort_by(|left, right| left.0.cmp(&right.0));

    let mut visible = query.window_size.min(ordered.len());
    let mut jump_applied = false;
    if let Some(target) = query.jump_target
        && let Some(index) = ordered
            .iter()
            .position(|(_, message)| &message.id == target)
        && index >= visible
    {
        visible = index + 1;
        jump_applied = true;
    }

    ThreadWindow {
        messages: ordered
            .into_iter()
            .take(visible)
            .map(|(_, message)| message.clone())
            .collect(),
        total_count,
        has_more: total_count > query.window_size,
        window_size: query.window_size,
        jump_applied,
    }
}
