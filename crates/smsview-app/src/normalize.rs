// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Direction, MessageId, MessageRecord, MessageStatus, MessageTime, Party};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizeReport {
    pub records: Vec<MessageRecord>,
    /// Array elements that were not JSON objects.
    pub skipped: usize,
}

/// Extracts message records from a parsed export. Accepts a bare array or
/// an object with a `messages` array; any other shape yields no records.
pub fn normalize(value: &Value) -> Vec<MessageRecord> {
    normalize_report(value).records
}

pub fn normalize_report(value: &Value) -> NormalizeReport {
    let Some(items) = message_array(value) else {
        debug!("export has no message array; treating as empty");
        return NormalizeReport::default();
    };

    let mut report = NormalizeReport {
        records: Vec::with_capacity(items.len()),
        skipped: 0,
    };
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => report.records.push(record_from_object(index, object)),
            None => report.skipped += 1,
        }
    }

    if report.skipped > 0 {
        warn!(
            skipped = report.skipped,
            kept = report.records.len(),
            "skipped non-object entries in message export"
        );
    }
    report
}

fn message_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(object) => object.get("messages").and_then(Value::as_array),
        _ => None,
    }
}

fn record_from_object(index: usize, object: &Map<String, Value>) -> MessageRecord {
    let id = object
        .get("id")
        .and_then(scalar_text)
        .map_or_else(|| MessageId::new(format!("missing-{index}")), MessageId::new);

    let party = object.get("party").and_then(Value::as_object);
    let party = Party {
        direction: party
            .and_then(|party| party.get("direction"))
            .and_then(Value::as_str)
            .and_then(Direction::parse),
        phone: party.and_then(|party| party.get("phone")).and_then(scalar_text),
        name: party
            .and_then(|party| party.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned),
    };

    let time = object.get("time").and_then(Value::as_object);
    let time = MessageTime {
        date: string_field(time, "date"),
        time: string_field(time, "time"),
    };

    MessageRecord {
        id,
        party,
        time,
        message: string_field(Some(object), "message"),
        status: MessageStatus::parse(&string_field(Some(object), "status")),
    }
}

fn string_field(object: Option<&Map<String, Value>>, field: &str) -> String {
    object
        .and_then(|object| object.get(field))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// Ids and phones are sometimes exported as JSON numbers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, normalize_report};
    use crate::{Direction, MessageId, MessageStatus};
    use serde_json::json;

    #[test]
    fn bare_array_and_messages_object_are_equivalent() {
        let item = json!({
            "id": 1,
            "party": {"direction": "from", "phone": "555", "name": "A"},
            "time": {"date": "01/10/2014", "time": "10:00:00(UTC+0)"},
            "message": "hi",
            "status": "Read"
        });
        let bare = normalize(&json!([item.clone()]));
        let wrapped = normalize(&json!({"messages": [item]}));
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);

        let record = &bare[0];
        assert_eq!(record.id, MessageId::from("1"));
        assert_eq!(record.party.direction, Some(Direction::From));
        assert_eq!(record.party.phone.as_deref(), Some("555"));
        assert_eq!(record.party.name.as_deref(), Some("A"));
        assert_eq!(record.time.clock(), "10:00:00");
        assert_eq!(record.message, "hi");
        assert_eq!(record.status, MessageStatus::Read);
    }

    #[test]
    fn other_shapes_normalize_to_empty() {
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!("messages")).is_empty());
        assert!(normalize(&json!({"data": []})).is_empty());
        assert!(normalize(&json!({"messages": {"id": 1}})).is_empty());
    }

    #[test]
    fn wrong_typed_fields_become_absent() {
        let records = normalize(&json!([{
            "id": "abc",
            "party": {"direction": 3, "phone": ["555"], "name": false},
            "time": "yesterday",
            "message": 12,
            "status": null
        }]));
        let record = &records[0];
        assert_eq!(record.id.as_str(), "abc");
        assert_eq!(record.party.direction, None);
        assert_eq!(record.party.phone, None);
        assert_eq!(record.party.name, None);
        assert_eq!(record.time.date, "");
        assert_eq!(record.message, "");
        assert_eq!(record.status, MessageStatus::Other(String::new()));
    }

    #[test]
    fn numeric_phone_is_kept_as_text() {
        let records = normalize(&json!([{"id": 4, "party": {"phone": 5551234}}]));
        assert_eq!(records[0].party.phone.as_deref(), Some("5551234"));
    }

    #[test]
    fn missing_ids_are_unique_per_position() {
        let records = normalize(&json!([{"message": "a"}, {"message": "b"}]));
        assert_eq!(records[0].id.as_str(), "missing-0");
        assert_eq!(records[1].id.as_str(), "missing-1");
    }

    #[test]
    fn non_object_entries_are_skipped_and_counted() {
        let report = normalize_report(&json!([1, {"id": 2}, "x", null]));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped, 3);
    }
}
