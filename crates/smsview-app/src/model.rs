// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Outgoing: the message was sent to the counterpart.
    To,
    /// Incoming: the message was received from the counterpart.
    From,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::From => "from",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "to" => Some(Self::To),
            "from" => Some(Self::From),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::To => "sent",
            Self::From => "received",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Read,
    Unread,
    Sent,
    Other(String),
}

impl MessageStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "Read",
            Self::Unread => "Unread",
            Self::Sent => "Sent",
            Self::Other(value) => value,
        }
    }

    /// Exact-case match; anything unrecognized is kept verbatim.
    pub fn parse(value: &str) -> Self {
        match value {
            "Read" => Self::Read,
            "Unread" => Self::Unread,
            "Sent" => Self::Sent,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn is_unread(&self) -> bool {
        matches!(self, Self::Unread)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub direction: Option<Direction>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// Export timestamp as written by the device, e.g. `01/10/2014` +
/// `10:46:46(UTC+0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTime {
    pub date: String,
    pub time: String,
}

impl MessageTime {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }

    /// Clock portion with any parenthesized timezone annotation removed.
    pub fn clock(&self) -> &str {
        self.time
            .split_once('(')
            .map_or(self.time.as_str(), |(clock, _)| clock)
            .trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub party: Party,
    pub time: MessageTime,
    pub message: String,
    pub status: MessageStatus,
}

impl MessageRecord {
    pub fn direction(&self) -> Option<Direction> {
        self.party.direction
    }
}
