//! Per-day grouping and batch analysis.
//!
//! Days are independent, so [`summarize_days`] analyzes them in parallel.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::compliance::{ComplianceResult, analyze_day};
use crate::interval::{TimeInterval, normalize};
use crate::overlap::detect_overlap;
use crate::period::{Period, short_breaks};

/// Closed intervals of one calendar day, plus how many timers were still
/// running on that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucket {
    pub intervals: Vec<TimeInterval>,
    pub running_entries: usize,
}

/// Dashboard view of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Plain sum of interval durations, overlaps counted twice.
    pub tracked_minutes: i64,
    pub has_overlap: bool,
    pub running_entries: usize,
    /// Gaps too short to count as a break, kept for display.
    pub short_breaks: Vec<Period>,
    pub result: ComplianceResult,
}

/// Calendar date of `ts` in `tz`. Every day boundary goes through here.
pub fn local_date<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Partitions intervals by the calendar date of their start in `tz`.
///
/// Intervals keep their input order inside a day.
pub fn group_by_day<Tz: TimeZone>(
    intervals: &[TimeInterval],
    tz: &Tz,
) -> BTreeMap<NaiveDate, Vec<TimeInterval>> {
    let mut days: BTreeMap<NaiveDate, Vec<TimeInterval>> = BTreeMap::new();
    for interval in intervals {
        days.entry(local_date(interval.start(), tz)).or_default().push(*interval);
    }
    days
}

/// Sum of normalized interval durations.
pub fn tracked_minutes(intervals: &[TimeInterval]) -> i64 {
    intervals.iter().map(TimeInterval::duration_minutes).sum()
}

/// Analyzes one day.
pub fn summarize_day(date: NaiveDate, bucket: &DayBucket) -> DaySummary {
    let result = analyze_day(&bucket.intervals);
    let has_overlap = detect_overlap(&bucket.intervals);
    tracing::debug!(%date, valid = result.valid, has_overlap, "summarized day");

    DaySummary {
        date,
        tracked_minutes: tracked_minutes(&bucket.intervals),
        has_overlap,
        running_entries: bucket.running_entries,
        short_breaks: short_breaks(&normalize(&bucket.intervals)),
        result,
    }
}

/// Analyzes every day in parallel. Output is ordered by date.
pub fn summarize_days(days: &BTreeMap<NaiveDate, DayBucket>) -> Vec<DaySummary> {
    let days: Vec<_> = days.iter().collect();
    days.par_iter()
        .map(|&(date, bucket)| summarize_day(*date, bucket))
        .collect()
}
