// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::contacts::{ContactListing, MessageSearchHit, contact_listing};
use crate::thread::{INITIAL_WINDOW, ThreadQuery, ThreadWindow, WINDOW_STEP, get_thread};
use crate::{ConversationKey, MessageId, MessageRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub messages: Vec<MessageRecord>,
    pub selected_conversation: Option<ConversationKey>,
    pub conversation_search: String,
    pub thread_search: String,
    pub window_size: usize,
    pub jump_target: Option<MessageId>,
    /// Narrow layouts show either the contact pane or the thread.
    pub show_contacts: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            selected_conversation: None,
            conversation_search: String::new(),
            thread_search: String::new(),
            window_size: INITIAL_WINDOW,
            jump_target: None,
            show_contacts: true,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetMessages(Vec<MessageRecord>),
    SelectConversation {
        key: ConversationKey,
        jump_target: Option<MessageId>,
    },
    ClearSelection,
    SetConversationSearch(String),
    SetThreadSearch(String),
    ClearThreadSearch,
    GrowWindow,
    SetWindowSize(usize),
    SetJumpTarget(MessageId),
    ClearJumpTarget,
}

impl AppCommand {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetMessages(_) => "set_messages",
            Self::SelectConversation { .. } => "select_conversation",
            Self::ClearSelection => "clear_selection",
            Self::SetConversationSearch(_) => "set_conversation_search",
            Self::SetThreadSearch(_) => "set_thread_search",
            Self::ClearThreadSearch => "clear_thread_search",
            Self::GrowWindow => "grow_window",
            Self::SetWindowSize(_) => "set_window_size",
            Self::SetJumpTarget(_) => "set_jump_target",
            Self::ClearJumpTarget => "clear_jump_target",
        }
    }

    /// Opening a search hit selects its conversation and jumps to the
    /// matching message.
    pub fn open_hit(hit: &MessageSearchHit) -> Self {
        Self::SelectConversation {
            key: hit.conversation_key.clone(),
            jump_target: Some(hit.message_id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    MessagesLoaded(usize),
    SelectionChanged(Option<ConversationKey>),
    ConversationSearchChanged(String),
    ThreadSearchChanged(String),
    WindowResized(usize),
    JumpTargetChanged(Option<MessageId>),
    ContactsVisibilityChanged(bool),
    StatusUpdated(String),
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        debug!(command = command.name(), "dispatch");
        match command {
            AppCommand::SetMessages(messages) => {
                let count = messages.len();
                self.messages = messages;
                self.selected_conversation = None;
                self.conversation_search.clear();
                self.thread_search.clear();
                self.jump_target = None;
                self.window_size = INITIAL_WINDOW;
                vec![
                    AppEvent::MessagesLoaded(count),
                    AppEvent::SelectionChanged(None),
                    AppEvent::ConversationSearchChanged(String::new()),
                    AppEvent::ThreadSearchChanged(String::new()),
                    AppEvent::JumpTargetChanged(None),
                    self.set_status(&format!("loaded {count} messages")),
                ]
            }
            AppCommand::SelectConversation { key, jump_target } => {
                self.selected_conversation = Some(key);
                self.window_size = INITIAL_WINDOW;
                self.jump_target = jump_target;
                self.show_contacts = false;
                vec![
                    AppEvent::SelectionChanged(self.selected_conversation.clone()),
                    AppEvent::WindowResized(self.window_size),
                    AppEvent::JumpTargetChanged(self.jump_target.clone()),
                    AppEvent::ContactsVisibilityChanged(self.show_contacts),
                ]
            }
            AppCommand::ClearSelection => {
                self.selected_conversation = None;
                self.jump_target = None;
                self.show_contacts = true;
                vec![
                    AppEvent::SelectionChanged(None),
                    AppEvent::JumpTargetChanged(None),
                    AppEvent::ContactsVisibilityChanged(true),
                ]
            }
            AppCommand::SetConversationSearch(term) => {
                self.conversation_search = term;
                vec![AppEvent::ConversationSearchChanged(
                    self.conversation_search.clone(),
                )]
            }
            AppCommand::SetThreadSearch(term) => {
                self.thread_search = term;
                vec![AppEvent::ThreadSearchChanged(self.thread_search.clone())]
            }
            AppCommand::ClearThreadSearch => {
                self.thread_search.clear();
                vec![AppEvent::ThreadSearchChanged(String::new())]
            }
            AppCommand::GrowWindow => {
                if self.selected_conversation.is_none() {
                    return Vec::new();
                }
                let grown = self.window_size.saturating_add(WINDOW_STEP);
                if grown == self.window_size {
                    return Vec::new();
                }
                self.window_size = grown;
                vec![AppEvent::WindowResized(self.window_size)]
            }
            AppCommand::SetWindowSize(size) => {
                if size <= self.window_size {
                    return Vec::new();
                }
                self.window_size = size;
                vec![AppEvent::WindowResized(self.window_size)]
            }
            AppCommand::SetJumpTarget(id) => {
                self.jump_target = Some(id);
                vec![AppEvent::JumpTargetChanged(self.jump_target.clone())]
            }
            AppCommand::ClearJumpTarget => {
                if self.jump_target.take().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::JumpTargetChanged(None)]
            }
        }
    }

    pub fn contact_listing(&self) -> ContactListing {
        contact_listing(&self.messages, &self.conversation_search)
    }

    pub fn thread(&self) -> Option<ThreadWindow> {
        let conversation = self.selected_conversation.as_ref()?;
        Some(get_thread(
            &self.messages,
            &ThreadQuery {
                conversation,
                search_term: &self.thread_search,
                window_size: self.window_size,
                jump_target: self.jump_target.as_ref(),
            },
        ))
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
