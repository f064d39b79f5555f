// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result, anyhow, bail};
use smsview_app::{
    AppCommand, AppEvent, AppState, ConversationKey, MessageId, MessageRecord, normalize_report,
    resolve,
};
use smsview_fetch::{Client, Source};
use tracing::info;

/// What to show once the export is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub search: Option<String>,
    pub conversation: Option<ConversationKey>,
    pub thread_search: Option<String>,
    pub window: Option<usize>,
    pub more: usize,
    pub jump: Option<MessageId>,
}

pub struct Loader {
    client: Client,
}

impl Loader {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::new(config.pastebin_base_url(), config.fetch_timeout()?)
            .context("invalid [fetch] config; fix timeout/pastebin_base_url values")?;
        Ok(Self { client })
    }

    /// Loads and normalizes an export. An export with no usable records is
    /// an error.
    pub fn load_messages(&self, source: &Source) -> Result<Vec<MessageRecord>> {
        let loaded = self
            .client
            .load(source)
            .with_context(|| format!("Failed to load {source}"))?;

        let report = normalize_report(&loaded.value);
        if report.records.is_empty() {
            bail!("{}", source.empty_export_message());
        }
        info!(
            count = report.records.len(),
            skipped = report.skipped,
            "normalized export"
        );
        Ok(report.records)
    }
}

/// Replays a view request against loaded state, returning every event the
/// dispatches produced.
pub fn apply_view(state: &mut AppState, view: &ViewRequest) -> Result<Vec<AppEvent>> {
    let mut events = Vec::new();

    if let Some(term) = &view.search {
        events.extend(state.dispatch(AppCommand::SetConversationSearch(term.clone())));
    }

    let conversation = match (&view.conversation, &view.jump) {
        (Some(key), _) => Some(key.clone()),
        (None, Some(id)) => Some(conversation_of(&state.messages, id)?),
        (None, None) => None,
    };
    let Some(key) = conversation else {
        return Ok(events);
    };

    if !state.messages.iter().any(|message| resolve(message) == key) {
        bail!("no conversation with key {key:?}; list conversations without --conversation");
    }

    events.extend(state.dispatch(AppCommand::SelectConversation {
        key,
        jump_target: view.jump.clone(),
    }));
    if let Some(term) = &view.thread_search {
        events.extend(state.dispatch(AppCommand::SetThreadSearch(term.clone())));
    }
    if let Some(size) = view.window {
        events.extend(state.dispatch(AppCommand::SetWindowSize(size)));
    }
    for _ in 0..view.more {
        events.extend(state.dispatch(AppCommand::GrowWindow));
    }
    Ok(events)
}

fn conversation_of(messages: &[MessageRecord], id: &MessageId) -> Result<ConversationKey> {
    messages
        .iter()
        .find(|message| &message.id == id)
        .map(resolve)
        .ok_or_else(|| anyhow!("no message with id {id:?}"))
}

#[cfg(test)]
mod tests {
    use super::{Loader, ViewRequest, apply_view};
    use crate::config::Config;
    use anyhow::Result;
    use smsview_app::{AppCommand, AppEvent, AppState, ConversationKey, MessageId};
    use smsview_fetch::Source;
    use smsview_testkit::{ExportFaker, sample_export, write_export};

    fn loaded_state() -> Result<AppState> {
        let (_dir, path) = write_export(&sample_export())?;
        let messages = Loader::new(&Config::default())?.load_messages(&Source::file(&path))?;
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetMessages(messages));
        Ok(state)
    }

    #[test]
    fn loader_normalizes_file_exports() -> Result<()> {
        let state = loaded_state()?;
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.status_line.as_deref(), Some("loaded 2 messages"));
        Ok(())
    }

    #[test]
    fn loader_rejects_exports_without_messages() -> Result<()> {
        let (_dir, path) = write_export(&serde_json::json!({"messages": []}))?;
        let error = Loader::new(&Config::default())?
            .load_messages(&Source::file(&path))
            .expect_err("empty export should fail");
        assert_eq!(error.to_string(), "No messages found in the JSON file");
        Ok(())
    }

    #[test]
    fn loader_accepts_wrapped_faker_exports() -> Result<()> {
        let (_dir, path) = write_export(&ExportFaker::new(4).wrapped_export(3, 25))?;
        let messages = Loader::new(&Config::default())?.load_messages(&Source::file(&path))?;
        assert_eq!(messages.len(), 25);
        Ok(())
    }

    #[test]
    fn empty_view_only_lists() -> Result<()> {
        let mut state = loaded_state()?;
        let events = apply_view(&mut state, &ViewRequest::default())?;
        assert!(events.is_empty());
        assert!(state.thread().is_none());
        Ok(())
    }

    #[test]
    fn view_selects_conversation_and_sizes_window() -> Result<()> {
        let mut state = loaded_state()?;
        apply_view(
            &mut state,
            &ViewRequest {
                conversation: Some(ConversationKey::from("555")),
                window: Some(120),
                more: 2,
                ..ViewRequest::default()
            },
        )?;
        assert_eq!(state.window_size, 220);
        let thread = state.thread().expect("conversation selected");
        assert_eq!(thread.messages.len(), 2);
        assert!(!thread.has_more);
        Ok(())
    }

    #[test]
    fn huge_window_with_more_pages_stays_at_max() -> Result<()> {
        let mut state = loaded_state()?;
        let events = apply_view(
            &mut state,
            &ViewRequest {
                conversation: Some(ConversationKey::from("555")),
                window: Some(usize::MAX),
                more: 1,
                ..ViewRequest::default()
            },
        )?;
        assert_eq!(state.window_size, usize::MAX);
        assert!(events.contains(&AppEvent::ContactsVisibilityChanged(false)));
        assert_eq!(state.thread().map(|thread| thread.messages.len()), Some(2));
        Ok(())
    }

    #[test]
    fn jump_without_conversation_opens_owning_thread() -> Result<()> {
        let mut state = loaded_state()?;
        let events = apply_view(
            &mut state,
            &ViewRequest {
                jump: Some(MessageId::from("2")),
                ..ViewRequest::default()
            },
        )?;
        assert!(events.contains(&AppEvent::SelectionChanged(Some(ConversationKey::from(
            "555"
        )))));
        assert_eq!(state.jump_target, Some(MessageId::from("2")));
        Ok(())
    }

    #[test]
    fn unknown_conversation_and_jump_are_errors() -> Result<()> {
        let mut state = loaded_state()?;
        let error = apply_view(
            &mut state,
            &ViewRequest {
                conversation: Some(ConversationKey::from("nobody")),
                ..ViewRequest::default()
            },
        )
        .expect_err("unknown key should fail");
        assert!(error.to_string().contains("no conversation with key"));

        let error = apply_view(
            &mut state,
            &ViewRequest {
                jump: Some(MessageId::from("404")),
                ..ViewRequest::default()
            },
        )
        .expect_err("unknown id should fail");
        assert!(error.to_string().contains("no message with id"));
        Ok(())
    }

    #[test]
    fn thread_search_is_applied_after_selection() -> Result<()> {
        let mut state = loaded_state()?;
        apply_view(
            &mut state,
            &ViewRequest {
                conversation: Some(ConversationKey::from("555")),
                thread_search: Some("HEY".to_owned()),
                ..ViewRequest::default()
            },
        )?;
        let thread = state.thread().expect("conversation selected");
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.total_count, 2);
        Ok(())
    }
}
