// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{ConversationKey, IdentityTier, MessageRecord};

pub const UNKNOWN_CONTACT: &str = "Unknown Contact";
pub const UNKNOWN_PHONE: &str = "Unknown";

/// Conversation key plus the display fields a message contributes to its
/// contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub key: ConversationKey,
    pub tier: IdentityTier,
    pub display_name: String,
    pub display_phone: String,
}

/// Phone first, then name, then one conversation per message.
pub fn resolve(record: &MessageRecord) -> ConversationKey {
    resolve_identity(record).key
}

pub fn resolve_identity(record: &MessageRecord) -> Identity {
    let party = &record.party;

    if let Some(phone) = non_blank(party.phone.as_deref()) {
        // Only an empty name falls back; whitespace is shown as exported.
        let display_name = match party.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => UNKNOWN_CONTACT.to_owned(),
        };
        return Identity {
            key: ConversationKey::for_phone(phone),
            tier: IdentityTier::Phone,
            display_name,
            display_phone: phone.to_owned(),
        };
    }

    if let Some(name) = non_blank(party.name.as_deref()) {
        return Identity {
            key: ConversationKey::for_name(name),
            tier: IdentityTier::Name,
            display_name: name.to_owned(),
            display_phone: UNKNOWN_PHONE.to_owned(),
        };
    }

    Identity {
        key: ConversationKey::for_message(&record.id),
        tier: IdentityTier::Fallback,
        display_name: format!("{UNKNOWN_CONTACT} {}", record.id),
        display_phone: UNKNOWN_PHONE.to_owned(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
