//! Date of birth parsing
//!
//! Accepted layouts are tried in a fixed priority order; the first layout
//! that yields a valid calendar date wins. Month and day may have one or two
//! digits, the year must have four.

use crate::constants::OUTPUT_DATE_FORMAT;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Which capture group holds each date component
#[derive(Debug, Clone, Copy)]
struct Layout {
    year: usize,
    month: usize,
    day: usize,
}

/// `MM/DD/YYYY`
static US_SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid date pattern"));

const US_SLASHED_LAYOUT: Layout = Layout {
    year: 3,
    month: 1,
    day: 2,
};

/// `YYYY-MM-DD`
static ISO_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid date pattern"));

const ISO_DASHED_LAYOUT: Layout = Layout {
    year: 1,
    month: 2,
    day: 3,
};

/// Normalize a date to `YYYY-MM-DD`
///
/// `01/02/2020` always reads as January 2nd: the slashed US layout is tried
/// before the ISO layout and no locale inference takes place.
pub fn normalize_date(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();

    parse_with(&US_SLASHED, US_SLASHED_LAYOUT, trimmed)
        .or_else(|| parse_with(&ISO_DASHED, ISO_DASHED_LAYOUT, trimmed))
        .map(|date| date.format(OUTPUT_DATE_FORMAT).to_string())
}

fn parse_with(pattern: &Regex, layout: Layout, value: &str) -> Option<NaiveDate> {
    let captures = pattern.captures(value)?;
    let year: i32 = captures.get(layout.year)?.as_str().parse().ok()?;
    if year < 1 {
        return None;
    }
    let month: u32 = captures.get(layout.month)?.as_str().parse().ok()?;
    let day: u32 = captures.get(layout.day)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
