//! Raw time intervals and minute normalization.
//!
//! Every comparison the engine makes (sorting, gaps, overlap, durations)
//! goes through [`round_to_minute`] first, so sub-minute jitter between
//! consecutive entries (10:00:59 vs 10:01:00) never shows up as a gap or an
//! overlap.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds at or above which a timestamp rounds up to the next minute.
const ROUND_UP_SECONDS: u32 = 30;

/// Caller contract violations for interval input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    /// A timestamp could not be parsed as RFC 3339.
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The interval ends before it starts.
    #[error("interval ends before it starts ({start} > {end})")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// One recorded work interval.
///
/// `end >= start` always holds. A zero-length interval is valid and yields a
/// zero-duration work period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = InvalidInputError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Creates an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidInputError> {
        if end < start {
            return Err(InvalidInputError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses an interval from two RFC 3339 timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self, InvalidInputError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns a copy with both endpoints rounded to whole minutes.
    #[must_use]
    pub fn normalized(&self) -> Self {
        // Rounding is monotonic, so end >= start still holds.
        Self {
            start: round_to_minute(self.start),
            end: round_to_minute(self.end),
        }
    }

    /// Whole minutes between the normalized endpoints.
    pub fn duration_minutes(&self) -> i64 {
        let normalized = self.normalized();
        (normalized.end - normalized.start).num_minutes()
    }
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, InvalidInputError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| InvalidInputError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Rounds a timestamp to the nearest whole minute, half-up on seconds.
///
/// Seconds below 30 are truncated; otherwise the timestamp moves to the
/// start of the next minute. Sub-second precision is always dropped.
pub fn round_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    let floored = ts
        - TimeDelta::seconds(i64::from(ts.second()))
        - TimeDelta::nanoseconds(i64::from(ts.nanosecond()));
    if ts.second() < ROUND_UP_SECONDS {
        floored
    } else {
        floored + TimeDelta::minutes(1)
    }
}

/// Normalizes every interval and sorts them by start.
///
/// The sort is stable: intervals with equal normalized starts keep their
/// input order. The caller's slice is left untouched.
pub fn normalize(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut normalized: Vec<_> = intervals.iter().map(TimeInterval::normalized).collect();
    normalized.sort_by_key(TimeInterval::start);
    normalized
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use super::TimeInterval;

    /// Timestamp on the fixture day (2025-01-15) at `h:m:s` UTC.
    pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, h, m, s)
            .single()
            .expect("valid test timestamp")
    }

    /// Interval on the fixture day from `h1:m1` to `h2:m2`.
    pub fn iv(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeInterval {
        TimeInterval::new(at(h1, m1, 0), at(h2, m2, 0)).expect("valid test interval")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{at, iv};
    use super::*;

    #[test]
    fn test_round_truncates_below_thirty_seconds() {
        assert_eq!(round_to_minute(at(10, 0, 29)), at(10, 0, 0));
        assert_eq!(round_to_minute(at(10, 0, 0)), at(10, 0, 0));
    }

    #[test]
    fn test_round_up_at_thirty_seconds() {
        assert_eq!(round_to_minute(at(10, 0, 30)), at(10, 1, 0));
        assert_eq!(round_to_minute(at(10, 0, 59)), at(10, 1, 0));
        assert_eq!(round_to_minute(at(23, 59, 45)), at(23, 59, 0) + TimeDelta::minutes(1));
    }

    #[test]
    fn test_round_drops_subsecond_precision() {
        let ts = at(10, 0, 10) + TimeDelta::milliseconds(750);
        assert_eq!(round_to_minute(ts), at(10, 0, 0));
    }

    #[test]
    fn test_jitter_does_not_create_gap() {
        let a = TimeInterval::new(at(9, 0, 0), at(10, 0, 59)).unwrap();
        let b = TimeInterval::new(at(10, 1, 0), at(11, 0, 0)).unwrap();
        let sorted = normalize(&[a, b]);
        assert_eq!(sorted[0].end(), sorted[1].start());
    }

    #[test]
    fn test_normalize_sorts_by_start() {
        let sorted = normalize(&[iv(13, 0, 14, 0), iv(9, 0, 10, 0), iv(11, 0, 12, 0)]);
        let starts: Vec<_> = sorted.iter().map(TimeInterval::start).collect();
        assert_eq!(starts, vec![at(9, 0, 0), at(11, 0, 0), at(13, 0, 0)]);
    }

    #[test]
    fn test_normalize_sort_is_stable_on_ties() {
        let long = iv(9, 0, 12, 0);
        let short = iv(9, 0, 9, 30);
        let sorted = normalize(&[long, short]);
        assert_eq!(sorted, vec![long, short]);

        let sorted = normalize(&[short, long]);
        assert_eq!(sorted, vec![short, long]);
    }

    #[test]
    fn test_normalize_does_not_touch_input() {
        let input = vec![TimeInterval::new(at(9, 0, 40), at(10, 0, 10)).unwrap()];
        let before = input.clone();
        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_new_rejects_end_before_start() {
        let err = TimeInterval::new(at(10, 0, 0), at(9, 0, 0)).unwrap_err();
        assert!(matches!(err, InvalidInputError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_zero_length_interval_is_valid() {
        let interval = TimeInterval::new(at(10, 0, 0), at(10, 0, 0)).unwrap();
        assert_eq!(interval.duration_minutes(), 0);
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let interval = TimeInterval::parse("2025-01-15T10:00:00+01:00", "2025-01-15T09:30:00Z").unwrap();
        assert_eq!(interval.start(), at(9, 0, 0));
        assert_eq!(interval.duration_minutes(), 30);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = TimeInterval::parse("yesterday", "2025-01-15T09:30:00Z").unwrap_err();
        match err {
            InvalidInputError::InvalidTimestamp { value, .. } => assert_eq!(value, "yesterday"),
            other @ InvalidInputError::EndBeforeStart { .. } => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deserialize_validates_order() {
        let ok: TimeInterval =
            serde_json::from_str(r#"{"start":"2025-01-15T09:00:00Z","end":"2025-01-15T10:00:00Z"}"#)
                .unwrap();
        assert_eq!(ok, iv(9, 0, 10, 0));

        let bad = serde_json::from_str::<TimeInterval>(
            r#"{"start":"2025-01-15T10:00:00Z","end":"2025-01-15T09:00:00Z"}"#,
        );
        assert!(bad.is_err());
    }
}
