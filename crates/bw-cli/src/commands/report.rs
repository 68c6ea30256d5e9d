//! Report command for the per-day break-compliance dashboard.
//!
//! This module implements `bw report` with optional month filtering and
//! output formats (human-readable, JSON). The day rendering is shared with
//! `bw day`.

use std::fmt::{self, Write as _};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bw_core::{DaySummary, MIN_BREAK_MINUTES, Period, TimeEntry, Violation};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use serde::Serialize;

use super::util::{format_minutes, month_bounds, read_entries};
use crate::{Config, PeriodOrder};

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Export file to read (`-` for stdin). Defaults to the configured input path.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Only show days of this month (YYYY-MM).
    #[arg(short, long)]
    pub month: Option<String>,
    /// Order of periods in each day's timeline.
    #[arg(long, value_enum)]
    pub order: Option<PeriodOrder>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ========== Report Generation ==========

/// Groups entries by local day, optionally keeps one date range, and
/// analyzes every remaining day.
pub fn summarize_entries<Tz: TimeZone>(
    entries: &[TimeEntry],
    tz: &Tz,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<DaySummary>> {
    let mut days = bw_core::bucket_entries(entries, tz)?;
    if let Some((first, last)) = range {
        days.retain(|date, _| (first..=last).contains(date));
    }
    tracing::debug!(days = days.len(), "analyzing days");
    Ok(bw_core::summarize_days(&days))
}

// ========== Text Output ==========

fn local_time<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

fn format_period<Tz: TimeZone>(period: &Period, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let kind = if period.is_break { "Break" } else { "Work" };
    let duration = format_minutes(period.duration_minutes);
    let overlap = if period.overlaps { "  [overlap]" } else { "" };
    let not_counted = if period.is_break && period.duration_minutes < MIN_BREAK_MINUTES {
        "  (not counted)"
    } else {
        ""
    };
    format!(
        "  {}-{}  {kind:<6}{duration:>8}{overlap}{not_counted}",
        local_time(period.start, tz),
        local_time(period.end, tz),
    )
}

/// Formats one day: header, warnings, timeline and totals.
///
/// Gaps too short to count as a break appear in the timeline, marked as
/// not counted, but never in the totals.
pub fn format_day<Tz: TimeZone>(summary: &DaySummary, order: PeriodOrder, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut output = String::new();
    let result = &summary.result;

    writeln!(
        output,
        "{} ({})",
        summary.date.format("%a %b %d %Y"),
        format_minutes(summary.tracked_minutes)
    )
    .unwrap();

    if !result.valid {
        writeln!(output, "  Attention! This day does not comply with the break policy").unwrap();
        if let Some(reason) = result.reason {
            writeln!(output, "    - {reason}").unwrap();
        }
    }
    if summary.has_overlap {
        writeln!(output, "  Warning! This day has overlapping time entries").unwrap();
    }
    if summary.running_entries > 0 {
        let noun = if summary.running_entries == 1 {
            "timer"
        } else {
            "timers"
        };
        writeln!(
            output,
            "  Note: {} running {noun} not included",
            summary.running_entries
        )
        .unwrap();
    }

    let mut periods: Vec<&Period> = result
        .periods
        .iter()
        .chain(&summary.short_breaks)
        .collect();
    periods.sort_by_key(|period| period.start);
    if order == PeriodOrder::NewestFirst {
        periods.reverse();
    }
    for period in periods {
        writeln!(output, "{}", format_period(period, tz)).unwrap();
    }

    writeln!(
        output,
        "  Total: work {}, break {}",
        format_minutes(result.totals.work_minutes),
        format_minutes(result.totals.break_minutes)
    )
    .unwrap();

    output
}

/// Formats the human-readable report output.
pub fn format_report<Tz: TimeZone>(summaries: &[DaySummary], order: PeriodOrder, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut output = String::new();

    writeln!(output, "BREAK COMPLIANCE REPORT").unwrap();
    writeln!(output, "───────────────────────").unwrap();

    if summaries.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No time entries found.").unwrap();
        return output;
    }

    for summary in summaries {
        writeln!(output).unwrap();
        output.push_str(&format_day(summary, order, tz));
    }

    let totals = JsonTotals::from_summaries(summaries);
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Days:         {}", totals.days).unwrap();
    writeln!(output, "Compliant:    {}", totals.compliant).unwrap();
    writeln!(output, "Violations:   {}", totals.violations).unwrap();
    writeln!(output, "Overlapping:  {}", totals.overlapping).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub days: Vec<JsonDay>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    pub tracked_minutes: i64,
    pub valid: bool,
    pub violation: Option<Violation>,
    pub reason: Option<&'static str>,
    pub has_overlap: bool,
    pub running_entries: usize,
    pub work_minutes: i64,
    pub break_minutes: i64,
    pub periods: Vec<JsonPeriod>,
    pub short_breaks: Vec<JsonPeriod>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub is_break: bool,
    pub overlaps: bool,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub days: usize,
    pub compliant: usize,
    pub violations: usize,
    pub overlapping: usize,
}

impl JsonTotals {
    fn from_summaries(summaries: &[DaySummary]) -> Self {
        let compliant = summaries.iter().filter(|s| s.result.valid).count();
        Self {
            days: summaries.len(),
            compliant,
            violations: summaries.len() - compliant,
            overlapping: summaries.iter().filter(|s| s.has_overlap).count(),
        }
    }
}

impl JsonDay {
    pub fn new<Tz: TimeZone>(summary: &DaySummary, tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let result = &summary.result;
        Self {
            date: summary.date.format("%Y-%m-%d").to_string(),
            tracked_minutes: summary.tracked_minutes,
            valid: result.valid,
            violation: result.reason,
            reason: result.reason.map(|v| v.reason()),
            has_overlap: summary.has_overlap,
            running_entries: summary.running_entries,
            work_minutes: result.totals.work_minutes,
            break_minutes: result.totals.break_minutes,
            periods: result.periods.iter().map(|p| JsonPeriod::new(p, tz)).collect(),
            short_breaks: summary
                .short_breaks
                .iter()
                .map(|p| JsonPeriod::new(p, tz))
                .collect(),
        }
    }
}

impl JsonPeriod {
    fn new<Tz: TimeZone>(period: &Period, tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            start: period.start.with_timezone(tz).to_rfc3339(),
            end: period.end.with_timezone(tz).to_rfc3339(),
            duration_minutes: period.duration_minutes,
            is_break: period.is_break,
            overlaps: period.overlaps,
        }
    }
}

/// Formats report data as JSON. Periods are always chronological here.
pub fn format_report_json<Tz: TimeZone>(summaries: &[DaySummary], tz: &Tz) -> Result<String>
where
    Tz::Offset: fmt::Display,
{
    let report = JsonReport {
        days: summaries.iter().map(|s| JsonDay::new(s, tz)).collect(),
        totals: JsonTotals::from_summaries(summaries),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let range = args.month.as_deref().map(month_bounds).transpose()?;
    let entries = read_entries(args.input.as_deref(), config)?;
    let summaries = summarize_entries(&entries, &Local, range)?;

    if args.json {
        writeln!(writer, "{}", format_report_json(&summaries, &Local)?)?;
    } else {
        let order = args.order.unwrap_or(config.period_order);
        write!(writer, "{}", format_report(&summaries, order, &Local))?;
    }

    Ok(())
}
