//! Tolerant parsers for the string-typed cells of the raw catalog.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

/// Separator used by every multi-value column in the source data.
pub const MULTI_VALUE_SEPARATOR: &str = ", ";

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the `date_added` column, which mixes several spellings.
pub struct DateParser;

impl DateParser {
    /// Date-only patterns, tried in order.
    const DATE_FORMATS: &'static [&'static str] = &[
        "%B %d, %Y",
        "%b %d, %Y",
        "%B %d %Y",
        "%Y-%m-%d",
        "%d-%b-%y",
        "%d-%b-%Y",
        "%d %B %Y",
        "%d/%m/%Y",
        "%Y/%m/%d",
    ];

    /// Date-time patterns whose time part is discarded.
    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Parse a date cell.
    ///
    /// Leading and trailing whitespace is ignored. Returns `None` for empty or
    /// unrecognised input; callers treat that as a missing date, not a failure.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        debug!("DateParser: could not parse date string \"{}\"", s);
        None
    }
}

// ── DurationParser ────────────────────────────────────────────────────────────

/// Extracts the numeric part of the `duration` column.
pub struct DurationParser;

impl DurationParser {
    fn leading_integer() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*(\d+)").expect("regex is valid"))
    }

    /// Leading integer token of `s`: `"90 min"` → 90, `"3 Seasons"` → 3.
    ///
    /// Returns `None` when the text does not start with digits or the number
    /// overflows `u32`.
    pub fn leading_number(s: &str) -> Option<u32> {
        Self::leading_integer()
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

// ── Multi-value splitting ─────────────────────────────────────────────────────

/// Split a multi-value cell on [`MULTI_VALUE_SEPARATOR`].
///
/// Segments are trimmed of whitespace and stray commas; empty segments are
/// dropped. A cell with no values yields `None`, never an empty vector.
pub fn split_multi_value(cell: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = cell?
        .split(MULTI_VALUE_SEPARATOR)
        .map(|segment| segment.trim_matches(|c: char| c.is_whitespace() || c == ','))
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Trim a single-valued cell, mapping blank cells to `None`.
pub fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    NAMES.get(index).copied()
}
