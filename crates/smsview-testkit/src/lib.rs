// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::PathBuf;
use time::macros::{datetime, format_description};
use time::{Duration, PrimitiveDateTime};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Turner", "Brooks",
];

const WORDS: [&str; 30] = [
    "running", "late", "dinner", "tonight", "call", "me", "when", "you", "land", "coffee",
    "tomorrow", "thanks", "again", "see", "you", "soon", "bus", "traffic", "okay", "sounds",
    "good", "pick", "up", "milk", "meeting", "moved", "to", "friday", "happy", "birthday",
];

const STATUSES: [&str; 4] = ["Read", "Unread", "Sent", "Read"];

/// One counterpart as it appears in an export; fields are left raw so the
/// generator can produce padded or blank values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeContact {
    pub phone: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of raw message exports.
#[derive(Debug, Clone)]
pub struct ExportFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl ExportFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    /// Mix of phone, name-only and anonymous counterparts, with occasional
    /// padding so trimming gets exercised.
    pub fn contact(&mut self) -> FakeContact {
        let name = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        match self.rng.int_n(10) {
            0..=5 => FakeContact {
                phone: Some(self.phone()),
                name: self.rng.bool().then_some(name),
            },
            6 => FakeContact {
                phone: Some(format!(" {} ", self.phone())),
                name: Some(String::new()),
            },
            7 | 8 => FakeContact {
                phone: self.rng.bool().then(|| "  ".to_owned()),
                name: Some(name),
            },
            _ => FakeContact {
                phone: None,
                name: None,
            },
        }
    }

    pub fn message(&mut self, contact: &FakeContact, at: PrimitiveDateTime) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let mut party = serde_json::Map::new();
        party.insert(
            "direction".to_owned(),
            json!(if self.rng.bool() { "to" } else { "from" }),
        );
        if let Some(phone) = &contact.phone {
            party.insert("phone".to_owned(), json!(phone));
        }
        if let Some(name) = &contact.name {
            party.insert("name".to_owned(), json!(name));
        }

        let (date, time) = if self.rng.int_n(25) == 0 {
            ("unknown".to_owned(), "??".to_owned())
        } else {
            export_time(at)
        };

        json!({
            "id": id,
            "party": Value::Object(party),
            "time": {"date": date, "time": time},
            "message": self.sentence(1, 8),
            "status": self.pick(&STATUSES),
        })
    }

    /// Bare-array export with `messages` records spread over `contacts`
    /// counterparts. Timestamps are shuffled relative to array order and
    /// sometimes repeat.
    pub fn export(&mut self, contacts: usize, messages: usize) -> Value {
        let roster: Vec<FakeContact> = (0..contacts.max(1)).map(|_| self.contact()).collect();
        let start = reference_start();
        let records: Vec<Value> = (0..messages)
            .map(|_| {
                let contact = roster[self.rng.int_n(roster.len())].clone();
                let minutes = self.rng.int_n(60 * 24 * 90) as i64;
                self.message(&contact, start + Duration::minutes(minutes))
            })
            .collect();
        Value::Array(records)
    }

    pub fn wrapped_export(&mut self, contacts: usize, messages: usize) -> Value {
        json!({ "messages": self.export(contacts, messages) })
    }

    fn phone(&mut self) -> String {
        format!(
            "+1{}{:03}{:04}",
            200 + self.rng.int_n(700),
            self.rng.int_n(1000),
            self.rng.int_n(10_000)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence
    }
}

/// The two-message export used throughout the docs: one phone contact,
/// one read and one unread message an hour apart.
pub fn sample_export() -> Value {
    json!([
        {
            "id": 1,
            "party": {"direction": "from", "phone": "555", "name": "A"},
            "time": {"date": "01/10/2014", "time": "10:00:00(UTC+0)"},
            "message": "hi",
            "status": "Read"
        },
        {
            "id": 2,
            "party": {"direction": "to", "phone": "555", "name": "A"},
            "time": {"date": "01/10/2014", "time": "11:00:00(UTC+0)"},
            "message": "hey there",
            "status": "Unread"
        }
    ])
}

/// Writes an export to a fresh temp dir; keep the `TempDir` alive for as
/// long as the path is used.
pub fn write_export(value: &Value) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("messages.json");
    let body = serde_json::to_string_pretty(value).context("encode export")?;
    std::fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

/// `(date, time)` strings in the export's own layout.
pub fn export_time(at: PrimitiveDateTime) -> (String, String) {
    let date = at
        .format(format_description!("[month]/[day]/[year]"))
        .unwrap_or_default();
    let time = at
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    (date, format!("{time}(UTC+0)"))
}

fn reference_start() -> PrimitiveDateTime {
    datetime!(2014-01-01 0:00)
}
