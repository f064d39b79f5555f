// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use smsview_app::timestamp::display_label;
use smsview_app::{
    AppState, ContactListing, ConversationKey, ConversationSummary, Identity, MessageRecord,
    MessageSearchHit, ThreadWindow, WINDOW_STEP, resolve, resolve_identity,
};
use std::io::Write;

#[derive(Debug, Serialize)]
struct ThreadOutput<'a> {
    conversation_key: &'a ConversationKey,
    display_name: &'a str,
    display_phone: &'a str,
    #[serde(flatten)]
    window: &'a ThreadWindow,
}

/// Renders whatever the state currently shows: the open thread once the
/// contact pane is hidden, the contact listing otherwise.
pub fn render_state(state: &AppState, json: bool, out: &mut impl Write) -> Result<()> {
    let open_thread = if state.show_contacts {
        None
    } else {
        state.selected_conversation.as_ref().zip(state.thread())
    };
    match open_thread {
        Some((key, window)) => {
            let identity = identity_for(&state.messages, key);
            if json {
                write_json(
                    out,
                    &ThreadOutput {
                        conversation_key: key,
                        display_name: &identity.display_name,
                        display_phone: &identity.display_phone,
                        window: &window,
                    },
                )
            } else {
                render_thread(&identity, &window, &state.thread_search, out)
            }
        }
        None => {
            let listing = state.contact_listing();
            if json {
                write_json(out, &listing)
            } else {
                render_listing(&listing, &state.conversation_search, out)
            }
        }
    }
}

/// One-line status for stderr; nothing when the state has none.
pub fn render_status(state: &AppState, out: &mut impl Write) -> Result<()> {
    if let Some(status) = &state.status_line {
        writeln!(out, "{status}")?;
    }
    Ok(())
}

pub fn render_listing(
    listing: &ContactListing,
    search_term: &str,
    out: &mut impl Write,
) -> Result<()> {
    match listing {
        ContactListing::Conversations(summaries) if summaries.is_empty() => {
            writeln!(out, "No conversations")?;
        }
        ContactListing::MessageHits(hits) if hits.is_empty() => {
            writeln!(out, "No messages match {search_term:?}")?;
        }
        ContactListing::Conversations(summaries) => {
            for summary in summaries {
                write_summary(summary, out)?;
            }
        }
        ContactListing::MessageHits(hits) => {
            writeln!(out, "{} messages match {search_term:?}", hits.len())?;
            for hit in hits {
                write_hit(hit, out)?;
            }
        }
    }
    Ok(())
}

pub fn render_thread(
    identity: &Identity,
    window: &ThreadWindow,
    thread_search: &str,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(
        out,
        "{} ({})  {} messages",
        identity.display_name, identity.display_phone, window.total_count
    )?;

    if window.messages.is_empty() && !thread_search.trim().is_empty() {
        writeln!(out, "No messages match {thread_search:?}")?;
    }
    for message in &window.messages {
        write_message(message, out)?;
    }

    if window.has_more {
        let next = window.remaining().min(WINDOW_STEP);
        writeln!(
            out,
            "... {} remaining; pass --more 1 to load {next} more",
            window.remaining()
        )?;
    }
    Ok(())
}

fn write_summary(summary: &ConversationSummary, out: &mut impl Write) -> Result<()> {
    let unread = if summary.unread_count > 0 {
        format!("  [{} unread]", summary.unread_count)
    } else {
        String::new()
    };
    writeln!(
        out,
        "{}  {}  ({} messages){unread}",
        summary.display_name, summary.display_phone, summary.total_message_count
    )?;
    writeln!(
        out,
        "    {}  {}",
        display_label(&summary.last_message_time),
        summary.last_message_text
    )?;
    writeln!(out, "    --conversation {}", summary.conversation_key)?;
    Ok(())
}

fn write_hit(hit: &MessageSearchHit, out: &mut impl Write) -> Result<()> {
    let direction = hit.direction.map(|d| d.label()).unwrap_or("unknown");
    writeln!(
        out,
        "{}  {} ({})  [{direction}]",
        display_label(&hit.last_message_time),
        hit.display_name,
        hit.display_phone
    )?;
    writeln!(out, "    {}", hit.last_message_text)?;
    writeln!(out, "    --jump {}", hit.message_id)?;
    Ok(())
}

fn write_message(message: &MessageRecord, out: &mut impl Write) -> Result<()> {
    let direction = message.direction().map(|d| d.label()).unwrap_or("unknown");
    let unread = if message.status.is_unread() {
        "  *"
    } else {
        ""
    };
    writeln!(
        out,
        "{}  [{direction}]  {}{unread}",
        display_label(&message.time),
        message.message
    )?;
    Ok(())
}

fn identity_for(messages: &[MessageRecord], key: &ConversationKey) -> Identity {
    messages
        .iter()
        .find(|message| &resolve(message) == key)
        .map(resolve_identity)
        .unwrap_or_else(|| Identity {
            key: key.clone(),
            tier: key.tier(),
            display_name: key.to_string(),
            display_phone: String::new(),
        })
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("encode JSON output")?;
    writeln!(out)?;
    Ok(())
}
