//! Day command: timeline and raw entries for a single date.

use std::fmt::{self, Write as _};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bw_core::{DaySummary, TimeEntry};
use chrono::{Local, NaiveDate, TimeZone};
use clap::Args;

use super::report::{JsonDay, format_day};
use super::util::{format_iso_duration, read_entries};
use crate::{Config, PeriodOrder};

#[derive(Debug, Args)]
pub struct DayArgs {
    /// Date to inspect (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Export file to read (`-` for stdin). Defaults to the configured input path.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Order of periods in the timeline.
    #[arg(long, value_enum)]
    pub order: Option<PeriodOrder>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Analyzes `date` and returns its summary with the entries that started on it.
pub fn summarize_date<'a, Tz: TimeZone>(
    entries: &'a [TimeEntry],
    date: NaiveDate,
    tz: &Tz,
) -> Result<(DaySummary, Vec<&'a TimeEntry>)> {
    let mut days = bw_core::bucket_entries(entries, tz)?;
    let bucket = days.remove(&date).unwrap_or_default();
    let summary = bw_core::summarize_day(date, &bucket);

    let mut on_date = Vec::new();
    for entry in entries {
        if bw_core::local_date(entry.start()?, tz) == date {
            on_date.push(entry);
        }
    }

    Ok((summary, on_date))
}

/// Formats the raw entries of a day.
pub fn format_entries<Tz: TimeZone>(entries: &[&TimeEntry], tz: &Tz) -> Result<String>
where
    Tz::Offset: fmt::Display,
{
    let mut output = String::new();
    writeln!(output, "  Entries:").unwrap();

    for entry in entries {
        let start = entry.start()?.with_timezone(tz).format("%H:%M").to_string();
        let end = match entry.closed_interval()? {
            Some(interval) => interval.end().with_timezone(tz).format("%H:%M").to_string(),
            None => "     ".to_string(),
        };
        let duration = format_iso_duration(entry.time_interval.duration.as_deref());
        let description = entry
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("(no description)");
        writeln!(output, "    {start}-{end}  {duration:<16}  {description}").unwrap();
    }

    Ok(output)
}

/// Runs the day command.
pub fn run<W: Write>(writer: &mut W, args: &DayArgs, config: &Config) -> Result<()> {
    let entries = read_entries(args.input.as_deref(), config)?;
    let (summary, on_date) = summarize_date(&entries, args.date, &Local)?;

    if args.json {
        let day = JsonDay::new(&summary, &Local);
        writeln!(writer, "{}", serde_json::to_string_pretty(&day)?)?;
        return Ok(());
    }

    let order = args.order.unwrap_or(config.period_order);
    write!(writer, "{}", format_day(&summary, order, &Local))?;
    if on_date.is_empty() {
        writeln!(writer, "  No entries on this date.")?;
    } else {
        write!(writer, "{}", format_entries(&on_date, &Local)?)?;
    }

    Ok(())
}
