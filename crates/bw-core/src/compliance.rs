//! Break-compliance classification for a single day.
//!
//! The policy is an ordered rule table: the first rule whose condition holds
//! decides the day. Order matters. The 10-hour cap and the 6-hour session
//! rule are checked before the break-sum rules, so a day with enough total
//! break can still fail because one session ran too long.

use std::fmt;

use serde::Serialize;

use crate::interval::{TimeInterval, normalize};
use crate::period::{Period, Totals, aggregate, build_periods};

const SIX_HOURS: i64 = 6 * 60;
const NINE_HOURS: i64 = 9 * 60;
const TEN_HOURS: i64 = 10 * 60;

const SHORT_DAY_MIN_BREAK: i64 = 30;
const LONG_DAY_MIN_BREAK: i64 = 45;

/// Why a day fails the break policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    MoreThanTenHours,
    LongSessionWithoutBreak,
    BreakUnder30,
    BreakUnder45,
}

impl Violation {
    /// Human-readable reason.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MoreThanTenHours => "more than 10 hours total work",
            Self::LongSessionWithoutBreak => "worked over 6 hours without a qualifying break",
            Self::BreakUnder30 => "total break time is less than 30 minutes",
            Self::BreakUnder45 => "total break time is less than 45 minutes",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Outcome of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Violation),
}

/// The numbers the policy looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayFacts {
    pub work_minutes: i64,
    pub break_minutes: i64,
    /// Longest work period left after short breaks were dropped.
    pub longest_session_minutes: i64,
}

impl DayFacts {
    /// Derives the facts from a built period sequence.
    pub fn from_periods(periods: &[Period]) -> Self {
        let Totals {
            work_minutes,
            break_minutes,
        } = aggregate(periods);
        let longest_session_minutes = periods
            .iter()
            .filter(|period| !period.is_break)
            .map(|period| period.duration_minutes)
            .max()
            .unwrap_or(0);

        Self {
            work_minutes,
            break_minutes,
            longest_session_minutes,
        }
    }
}

/// One row of the policy table.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&DayFacts) -> bool,
    pub verdict: Verdict,
}

const fn short_day(facts: &DayFacts) -> bool {
    facts.work_minutes <= SIX_HOURS
}

const fn over_ten_hours(facts: &DayFacts) -> bool {
    facts.work_minutes > TEN_HOURS
}

const fn long_session(facts: &DayFacts) -> bool {
    facts.longest_session_minutes > SIX_HOURS
}

const fn up_to_nine_hours_with_break(facts: &DayFacts) -> bool {
    facts.work_minutes <= NINE_HOURS && facts.break_minutes >= SHORT_DAY_MIN_BREAK
}

const fn up_to_nine_hours(facts: &DayFacts) -> bool {
    facts.work_minutes <= NINE_HOURS
}

const fn over_nine_hours_with_break(facts: &DayFacts) -> bool {
    facts.break_minutes >= LONG_DAY_MIN_BREAK
}

const fn always(_: &DayFacts) -> bool {
    true
}

/// The break policy, evaluated top to bottom.
pub static RULES: [Rule; 7] = [
    Rule {
        name: "up to 6 hours needs no break",
        applies: short_day,
        verdict: Verdict::Valid,
    },
    Rule {
        name: "no more than 10 hours",
        applies: over_ten_hours,
        verdict: Verdict::Invalid(Violation::MoreThanTenHours),
    },
    Rule {
        name: "no session over 6 hours",
        applies: long_session,
        verdict: Verdict::Invalid(Violation::LongSessionWithoutBreak),
    },
    Rule {
        name: "up to 9 hours with 30 minutes break",
        applies: up_to_nine_hours_with_break,
        verdict: Verdict::Valid,
    },
    Rule {
        name: "up to 9 hours needs 30 minutes break",
        applies: up_to_nine_hours,
        verdict: Verdict::Invalid(Violation::BreakUnder30),
    },
    Rule {
        name: "over 9 hours with 45 minutes break",
        applies: over_nine_hours_with_break,
        verdict: Verdict::Valid,
    },
    Rule {
        name: "over 9 hours needs 45 minutes break",
        applies: always,
        verdict: Verdict::Invalid(Violation::BreakUnder45),
    },
];

/// Returns the first rule that applies.
pub fn matching_rule(facts: &DayFacts) -> &'static Rule {
    let last = &RULES[RULES.len() - 1];
    RULES
        .iter()
        .find(|rule| (rule.applies)(facts))
        .unwrap_or(last)
}

/// Result of analyzing one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    pub valid: bool,
    /// Chronological work/break sequence.
    pub periods: Vec<Period>,
    /// Present exactly when `valid` is false.
    pub reason: Option<Violation>,
    pub totals: Totals,
}

/// Builds periods for one day's intervals and classifies the day.
///
/// Intervals may be unsorted and carry sub-minute noise; they are
/// normalized first. An empty day is valid with no periods.
pub fn analyze_day(intervals: &[TimeInterval]) -> ComplianceResult {
    let sorted = normalize(intervals);
    let periods = build_periods(&sorted);
    let facts = DayFacts::from_periods(&periods);
    let rule = matching_rule(&facts);

    tracing::debug!(
        intervals = intervals.len(),
        periods = periods.len(),
        work_minutes = facts.work_minutes,
        break_minutes = facts.break_minutes,
        longest_session_minutes = facts.longest_session_minutes,
        rule = rule.name,
        "classified day"
    );

    let reason = match rule.verdict {
        Verdict::Valid => None,
        Verdict::Invalid(violation) => Some(violation),
    };

    ComplianceResult {
        valid: reason.is_none(),
        periods,
        reason,
        totals: Totals {
            work_minutes: facts.work_minutes,
            break_minutes: facts.break_minutes,
        },
    }
}
