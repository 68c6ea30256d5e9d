//! Exported time entries.
//!
//! Entries come from the time-tracking service's export as a JSON array.
//! Only the fields the dashboard needs are modeled; anything else in the
//! export is ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::{DayBucket, group_by_day, local_date};
use crate::interval::{InvalidInputError, TimeInterval, parse_timestamp};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("time entry {id}: {source}")]
    Invalid {
        id: String,
        #[source]
        source: InvalidInputError,
    },
}

/// A single time entry as exported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    pub time_interval: EntryInterval,
    #[serde(default)]
    pub is_locked: bool,
}

/// Start, end and ISO 8601 duration of an entry.
///
/// `end` and `duration` are null while the timer is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInterval {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl TimeEntry {
    fn invalid(&self, source: InvalidInputError) -> EntryError {
        EntryError::Invalid {
            id: self.id.clone(),
            source,
        }
    }

    /// Parsed start timestamp.
    pub fn start(&self) -> Result<DateTime<Utc>, EntryError> {
        parse_timestamp(&self.time_interval.start).map_err(|e| self.invalid(e))
    }

    /// The closed interval of this entry, or `None` while its timer runs.
    ///
    /// A missing end and an end equal to the start both mean "running".
    pub fn closed_interval(&self) -> Result<Option<TimeInterval>, EntryError> {
        let Some(end) = self.time_interval.end.as_deref() else {
            return Ok(None);
        };
        let interval =
            TimeInterval::parse(&self.time_interval.start, end).map_err(|e| self.invalid(e))?;
        if interval.start() == interval.end() {
            return Ok(None);
        }
        Ok(Some(interval))
    }

    pub fn is_running(&self) -> Result<bool, EntryError> {
        Ok(self.closed_interval()?.is_none())
    }
}

/// Parses a JSON array of entries.
pub fn load_entries<R: Read>(reader: R) -> Result<Vec<TimeEntry>, EntryError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Reads and parses an export file.
pub fn load_entries_from_path(path: &Path) -> Result<Vec<TimeEntry>, EntryError> {
    let file = File::open(path)?;
    load_entries(file)
}

/// Buckets entries by the calendar date of their start in `tz`.
///
/// Running entries are counted on their start date but never analyzed.
/// Any malformed entry fails the whole batch.
pub fn bucket_entries<Tz: TimeZone>(
    entries: &[TimeEntry],
    tz: &Tz,
) -> Result<BTreeMap<NaiveDate, DayBucket>, EntryError> {
    let mut closed = Vec::with_capacity(entries.len());
    let mut running = Vec::new();
    for entry in entries {
        match entry.closed_interval()? {
            Some(interval) => closed.push(interval),
            None => running.push(entry),
        }
    }

    let mut days: BTreeMap<NaiveDate, DayBucket> = group_by_day(&closed, tz)
        .into_iter()
        .map(|(date, intervals)| {
            let bucket = DayBucket {
                intervals,
                running_entries: 0,
            };
            (date, bucket)
        })
        .collect();

    for entry in running {
        let date = local_date(entry.start()?, tz);
        tracing::warn!(entry = %entry.id, %date, "timer still running, entry not analyzed");
        days.entry(date).or_default().running_entries += 1;
    }

    Ok(days)
}
