// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Export timestamps arrive as a free-form `date` string plus a `time`
//! string that may carry a `(UTC+0)` style annotation. Everything that
//! orders messages goes through [`sort_key`], so supporting another export
//! format only touches this module.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

use crate::{MessageRecord, MessageTime};

/// Total ordering key. `None` (unparseable) sorts before every real
/// timestamp.
pub type SortKey = Option<PrimitiveDateTime>;

type Layout = &'static [BorrowedFormatItem<'static>];

// The device's own `M/D/YYYY`, then ISO dates with either separator.
const DATE_LAYOUTS: [Layout; 3] = [
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]/[month]/[day]"),
];

const CLOCK_LAYOUTS: [Layout; 5] = [
    format_description!("[hour padding:none]:[minute]:[second]"),
    format_description!("[hour padding:none]:[minute]:[second].[subsecond]"),
    format_description!("[hour padding:none]:[minute]"),
    format_description!(
        "[hour repr:12 padding:none]:[minute]:[second] [period case_sensitive:false]"
    ),
    format_description!("[hour repr:12 padding:none]:[minute] [period case_sensitive:false]"),
];

pub fn sort_key(record: &MessageRecord) -> SortKey {
    parse_timestamp(&record.time)
}

pub fn parse_timestamp(time: &MessageTime) -> Option<PrimitiveDateTime> {
    let date = parse_date(time.date.trim())?;
    let clock = time.clock();
    let time = if clock.is_empty() {
        Time::MIDNIGHT
    } else {
        parse_clock(clock)?
    };
    Some(PrimitiveDateTime::new(date, time))
}

/// Short human label such as `Jan 10, 10:46 AM`; falls back to the raw
/// export text when the timestamp does not parse.
pub fn display_label(time: &MessageTime) -> String {
    let Some(parsed) = parse_timestamp(time) else {
        return format!("{} {}", time.date.trim(), time.clock())
            .trim()
            .to_owned();
    };
    parsed
        .format(format_description!(
            "[month repr:short] [day padding:none], [hour repr:12 padding:none]:[minute] [period]"
        ))
        .unwrap_or_else(|_| time.date.clone())
}

fn parse_date(raw: &str) -> Option<Date> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| Date::parse(raw, layout).ok())
}

fn parse_clock(raw: &str) -> Option<Time> {
    CLOCK_LAYOUTS
        .iter()
        .find_map(|layout| Time::parse(raw, layout).ok())
}
