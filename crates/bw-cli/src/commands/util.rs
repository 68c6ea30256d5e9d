//! Shared utilities for CLI commands.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use bw_core::TimeEntry;
use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::Config;

/// Pre-compiled regex for ISO 8601 entry durations (`PT1H30M`).
static ISO_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:\d+(?:\.\d+)?S)?$").unwrap());

/// Formats minutes as "Xh Ym", dropping zero parts. Zero is "0m".
pub fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return "0m".to_string();
    }
    join_parts(minutes / 60, minutes % 60)
}

fn join_parts(hours: i64, minutes: i64) -> String {
    match (hours, minutes) {
        (0, 0) => "0m".to_string(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Formats an entry's ISO 8601 duration the same way as [`format_minutes`].
///
/// A missing duration means the timer is still running.
pub fn format_iso_duration(duration: Option<&str>) -> String {
    let Some(duration) = duration else {
        return "Timer running...".to_string();
    };
    let Some(caps) = ISO_DURATION_RE.captures(duration) else {
        return "Invalid duration".to_string();
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };
    join_parts(part(1), part(2))
}

/// Parses "YYYY-MM" into the first and last day of that month.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month: {month}. Use YYYY-MM (e.g., 2025-01)"))?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .with_context(|| format!("month out of range: {month}"))?;
    let last = next.pred_opt().context("month out of range")?;
    Ok((first, last))
}

/// Reads exported entries from `input`, or from the configured path.
///
/// `-` reads from stdin.
pub fn read_entries(input: Option<&Path>, config: &Config) -> Result<Vec<TimeEntry>> {
    let path = input.unwrap_or(config.input_path.as_path());
    tracing::debug!(path = %path.display(), "reading entries");

    let entries = if path == Path::new("-") {
        bw_core::load_entries(io::stdin().lock()).context("failed to read entries from stdin")?
    } else {
        bw_core::load_entries_from_path(path)
            .with_context(|| format!("failed to read entries from {}", path.display()))?
    };

    tracing::debug!(count = entries.len(), "loaded entries");
    Ok(entries)
}
