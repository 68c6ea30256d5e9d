//! Core domain logic for break-compliance analysis.
//!
//! This crate contains the fundamental types and logic for:
//! - Normalization: rounding time intervals to whole minutes
//! - Periods: turning a day's intervals into work and break periods
//! - Compliance: classifying a day against the break policy
//! - Overlap: detecting intersecting intervals
//! - Entries: reading exported time entries and grouping them by day

pub mod compliance;
pub mod day;
pub mod entry;
pub mod interval;
mod overlap;
pub mod period;

pub use compliance::{ComplianceResult, DayFacts, RULES, Rule, Verdict, Violation, analyze_day};
pub use day::{
    DayBucket, DaySummary, group_by_day, local_date, summarize_day, summarize_days,
    tracked_minutes,
};
pub use entry::{
    EntryError, EntryInterval, TimeEntry, bucket_entries, load_entries, load_entries_from_path,
};
pub use interval::{InvalidInputError, TimeInterval, normalize, round_to_minute};
pub use overlap::detect_overlap;
pub use period::{MIN_BREAK_MINUTES, Period, Totals, aggregate, build_periods, short_breaks};
