//! Work/break period building and aggregation.
//!
//! # Algorithm Summary
//!
//! 1. Emit one work period per interval, and a break period for every
//!    positive gap between consecutive intervals
//! 2. Merge adjacent work periods
//! 3. Drop breaks shorter than [`MIN_BREAK_MINUTES`]
//! 4. Merge again so work around a dropped break coalesces into one session.
//!    The gap itself is not work: a merged period's duration is the sum of
//!    its members, while its span runs from the first start to the last end

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::interval::TimeInterval;
use crate::overlap::overlaps_successor;

/// Shortest gap that counts as a real break.
pub const MIN_BREAK_MINUTES: i64 = 15;

/// A span of work or break within one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub is_break: bool,
    /// Set when one of the intervals forming this period overlaps its successor.
    pub overlaps: bool,
}

impl Period {
    fn work(interval: &TimeInterval, overlaps: bool) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
            duration_minutes: (interval.end() - interval.start()).num_minutes(),
            is_break: false,
            overlaps,
        }
    }

    fn gap(start: DateTime<Utc>, end: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            start,
            end,
            duration_minutes,
            is_break: true,
            overlaps: false,
        }
    }
}

/// Summed work and break time over a period sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub work_minutes: i64,
    pub break_minutes: i64,
}

/// Builds the work/break sequence for one day.
///
/// `sorted` must be normalized and sorted by start (see
/// [`crate::interval::normalize`]). Returns periods in chronological order;
/// no input yields no periods.
pub fn build_periods(sorted: &[TimeInterval]) -> Vec<Period> {
    let with_short_breaks = merge_work_runs(emit_periods(sorted));
    let qualifying = with_short_breaks
        .into_iter()
        .filter(|period| !is_short_break(period))
        .collect();

    merge_work_runs(qualifying)
}

/// Gaps that [`build_periods`] drops for being shorter than
/// [`MIN_BREAK_MINUTES`], in chronological order.
pub fn short_breaks(sorted: &[TimeInterval]) -> Vec<Period> {
    emit_periods(sorted)
        .into_iter()
        .filter(is_short_break)
        .collect()
}

fn is_short_break(period: &Period) -> bool {
    period.is_break && period.duration_minutes < MIN_BREAK_MINUTES
}

/// One work period per interval, with a break for every positive gap.
fn emit_periods(sorted: &[TimeInterval]) -> Vec<Period> {
    let flags = overlaps_successor(sorted);
    let mut periods = Vec::with_capacity(sorted.len() * 2);

    for (i, (interval, overlaps)) in sorted.iter().zip(flags).enumerate() {
        periods.push(Period::work(interval, overlaps));

        if let Some(next) = sorted.get(i + 1) {
            let gap = (next.start() - interval.end()).num_minutes();
            if gap > 0 {
                periods.push(Period::gap(interval.end(), next.start(), gap));
            }
        }
    }

    periods
}

/// Collapses every run of consecutive work periods into a single period.
///
/// The merged period starts where the run starts, ends at the last member's
/// end, and carries the summed duration. Breaks pass through unchanged.
fn merge_work_runs(periods: Vec<Period>) -> Vec<Period> {
    let mut merged = Vec::with_capacity(periods.len());
    let mut current: Option<Period> = None;

    for period in periods {
        if period.is_break {
            merged.extend(current.take());
            merged.push(period);
            continue;
        }

        match current.as_mut() {
            Some(work) => {
                work.duration_minutes += period.duration_minutes;
                work.end = period.end;
                work.overlaps |= period.overlaps;
            }
            None => current = Some(period),
        }
    }

    merged.extend(current);
    merged
}

/// Sums work and break minutes.
pub fn aggregate(periods: &[Period]) -> Totals {
    periods.iter().fold(Totals::default(), |mut totals, period| {
        if period.is_break {
            totals.break_minutes += period.duration_minutes;
        } else {
            totals.work_minutes += period.duration_minutes;
        }
        totals
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::normalize;
    use crate::interval::test_support::{at, iv};

    fn periods_for(intervals: &[TimeInterval]) -> Vec<Period> {
        build_periods(&normalize(intervals))
    }

    fn shape(periods: &[Period]) -> Vec<(bool, i64)> {
        periods
            .iter()
            .map(|p| (p.is_break, p.duration_minutes))
            .collect()
    }

    #[test]
    fn test_no_intervals_no_periods() {
        assert!(periods_for(&[]).is_empty());
        assert_eq!(aggregate(&[]), Totals::default());
    }

    #[test]
    fn test_single_interval_single_work_period() {
        let periods = periods_for(&[iv(9, 0, 17, 0)]);
        assert_eq!(
            periods,
            vec![Period {
                start: at(9, 0, 0),
                end: at(17, 0, 0),
                duration_minutes: 480,
                is_break: false,
                overlaps: false,
            }]
        );
    }

    #[test]
    fn test_qualifying_break_is_kept() {
        let periods = periods_for(&[iv(9, 0, 12, 0), iv(12, 30, 17, 0)]);
        assert_eq!(shape(&periods), vec![(false, 180), (true, 30), (false, 270)]);
        assert_eq!(periods[1].start, at(12, 0, 0));
        assert_eq!(periods[1].end, at(12, 30, 0));
    }

    #[test]
    fn test_short_break_is_dropped_not_counted_as_work() {
        let periods = periods_for(&[iv(9, 0, 12, 0), iv(12, 10, 17, 0)]);
        assert_eq!(shape(&periods), vec![(false, 470)]);
        assert_eq!(periods[0].start, at(9, 0, 0));
        assert_eq!(periods[0].end, at(17, 0, 0));
    }

    #[test]
    fn test_fifteen_minute_break_qualifies() {
        let periods = periods_for(&[iv(9, 0, 12, 0), iv(12, 15, 13, 0)]);
        assert_eq!(shape(&periods), vec![(false, 180), (true, 15), (false, 45)]);

        let periods = periods_for(&[iv(9, 0, 12, 0), iv(12, 14, 13, 0)]);
        assert_eq!(shape(&periods), vec![(false, 226)]);
    }

    #[test]
    fn test_short_breaks_lists_dropped_gaps() {
        let sorted = normalize(&[iv(9, 0, 12, 0), iv(12, 10, 13, 0), iv(13, 30, 14, 0)]);
        let dropped = short_breaks(&sorted);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].start, at(12, 0, 0));
        assert_eq!(dropped[0].end, at(12, 10, 0));
        assert_eq!(dropped[0].duration_minutes, 10);
        assert!(dropped[0].is_break);

        assert!(short_breaks(&normalize(&[iv(9, 0, 17, 0)])).is_empty());
    }

    #[test]
    fn test_adjacent_intervals_merge() {
        let periods = periods_for(&[iv(9, 0, 10, 0), iv(10, 0, 11, 0), iv(11, 0, 12, 0)]);
        assert_eq!(shape(&periods), vec![(false, 180)]);
        assert_eq!(periods[0].end, at(12, 0, 0));
    }

    #[test]
    fn test_short_breaks_coalesce_around_long_break() {
        let periods = periods_for(&[
            iv(8, 0, 10, 0),
            iv(10, 5, 12, 0),
            iv(12, 45, 14, 0),
            iv(14, 10, 16, 0),
        ]);
        assert_eq!(shape(&periods), vec![(false, 235), (true, 45), (false, 185)]);
    }

    #[test]
    fn test_overlap_flag_propagates_to_merged_period() {
        let periods = periods_for(&[iv(9, 0, 12, 0), iv(11, 0, 13, 0), iv(14, 0, 15, 0)]);
        assert_eq!(shape(&periods), vec![(false, 300), (true, 60), (false, 60)]);
        assert!(periods[0].overlaps);
        assert!(!periods[1].overlaps);
        assert!(!periods[2].overlaps);
        // Merged end is the last member's end.
        assert_eq!(periods[0].end, at(13, 0, 0));
    }

    #[test]
    fn test_duplicates_merge_without_failing() {
        let periods = periods_for(&[iv(9, 0, 10, 0), iv(9, 0, 10, 0)]);
        assert_eq!(shape(&periods), vec![(false, 120)]);
        assert!(periods[0].overlaps);
    }

    #[test]
    fn test_zero_length_interval_is_zero_work() {
        let running = TimeInterval::new(at(9, 0, 0), at(9, 0, 0)).unwrap();
        let periods = periods_for(&[running]);
        assert_eq!(shape(&periods), vec![(false, 0)]);
    }

    #[test]
    fn test_jittered_shuffled_input_matches_clean_input() {
        let clean = periods_for(&[iv(9, 0, 12, 0), iv(12, 30, 15, 0), iv(15, 5, 17, 0)]);
        let jittered = periods_for(&[
            TimeInterval::new(at(15, 4, 31), at(16, 59, 50)).unwrap(),
            TimeInterval::new(at(8, 59, 45), at(12, 0, 12)).unwrap(),
            TimeInterval::new(at(12, 29, 59), at(15, 0, 29)).unwrap(),
        ]);
        assert_eq!(clean, jittered);
    }

    #[test]
    fn test_totals_account_for_every_period() {
        let days: Vec<Vec<TimeInterval>> = vec![
            vec![iv(9, 0, 12, 0), iv(12, 10, 17, 0)],
            vec![iv(9, 0, 12, 0), iv(12, 30, 17, 0), iv(17, 5, 18, 0)],
            vec![iv(7, 0, 9, 0), iv(8, 30, 10, 0), iv(11, 0, 11, 1)],
        ];
        for day in days {
            let periods = periods_for(&day);
            let totals = aggregate(&periods);
            let sum: i64 = periods.iter().map(|p| p.duration_minutes).sum();
            assert_eq!(totals.work_minutes + totals.break_minutes, sum);
            assert!(
                periods
                    .iter()
                    .filter(|p| p.is_break)
                    .all(|p| p.duration_minutes >= MIN_BREAK_MINUTES)
            );
        }
    }

    #[test]
    fn test_extending_an_end_never_decreases_work() {
        let base = vec![iv(9, 0, 11, 0), iv(11, 20, 13, 0), iv(14, 0, 16, 0)];
        let base_work = aggregate(&periods_for(&base)).work_minutes;

        for index in 0..base.len() {
            for extra in [1, 5, 10, 30, 60, 120] {
                let mut extended = base.clone();
                let original = extended[index];
                extended[index] = TimeInterval::new(
                    original.start(),
                    original.end() + chrono::TimeDelta::minutes(extra),
                )
                .unwrap();
                let work = aggregate(&periods_for(&extended)).work_minutes;
                assert!(
                    work >= base_work,
                    "extending interval {index} by {extra}m dropped work from {base_work} to {work}"
                );
            }
        }
    }

    #[test]
    fn test_aggregate_splits_work_and_break() {
        let periods = periods_for(&[iv(9, 0, 12, 0), iv(12, 30, 17, 0)]);
        assert_eq!(
            aggregate(&periods),
            Totals {
                work_minutes: 450,
                break_minutes: 30,
            }
        );
    }
}
