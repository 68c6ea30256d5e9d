//! Overlap detection over normalized intervals.

use crate::interval::{TimeInterval, normalize};

/// Strict intersection test. Intervals that only touch at an endpoint do
/// not overlap. Both intervals are expected to be normalized already.
fn intersects(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start() < b.end() && a.end() > b.start()
}

/// Returns true if any two intervals of the day overlap.
///
/// Pairwise O(n²) check on minute-normalized intervals. Independent of
/// period building, so it also catches overlaps that the successor-only
/// flag on [`crate::Period`] misses.
pub fn detect_overlap(intervals: &[TimeInterval]) -> bool {
    let normalized = normalize(intervals);
    normalized.iter().enumerate().any(|(i, a)| {
        normalized[i + 1..].iter().any(|b| intersects(a, b))
    })
}

/// Per-interval overlap flags for sorted, normalized intervals.
///
/// Each interval is tested against its immediate successor in sort order;
/// the last interval is never flagged.
pub(crate) fn overlaps_successor(sorted: &[TimeInterval]) -> Vec<bool> {
    let mut flags: Vec<bool> = sorted
        .windows(2)
        .map(|pair| intersects(&pair[0], &pair[1]))
        .collect();
    if !sorted.is_empty() {
        flags.push(false);
    }
    flags
}
