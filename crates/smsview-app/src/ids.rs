// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(MessageId);
string_id!(ConversationKey);

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

pub const NAME_KEY_PREFIX: &str = "name_";
pub const UNKNOWN_KEY_PREFIX: &str = "unknown_";

/// Which resolution rule produced a conversation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityTier {
    Phone,
    Name,
    Fallback,
}

impl ConversationKey {
    pub fn for_phone(phone: &str) -> Self {
        Self(phone.to_owned())
    }

    pub fn for_name(name: &str) -> Self {
        Self(format!("{NAME_KEY_PREFIX}{name}"))
    }

    pub fn for_message(id: &MessageId) -> Self {
        Self(format!("{UNKNOWN_KEY_PREFIX}{id}"))
    }

    /// Best-effort tier read back from the key text. Phone keys carry no
    /// prefix, so a phone that itself starts with a prefix reads as the
    /// other tier; resolution never relies on this.
    pub fn tier(&self) -> IdentityTier {
        if self.0.starts_with(UNKNOWN_KEY_PREFIX) {
            IdentityTier::Fallback
        } else if self.0.starts_with(NAME_KEY_PREFIX) {
            IdentityTier::Name
        } else {
            IdentityTier::Phone
        }
    }
}
