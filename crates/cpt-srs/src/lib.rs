//! SRS (Spaced Repetition System) library for CodePulse Tracker
//!
//! This crate provides the fixed review interval table and the step function that
//! turns a completion into the next scheduled review date.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Review intervals in days, indexed by how many times the problem has already
/// been completed since its schedule was last reset.
pub const REVIEW_INTERVALS_DAYS: [i64; 6] = [1, 3, 7, 14, 30, 90];

/// Ordered, monotone table of review intervals.
///
/// Once the repetition count runs past the end of the table the last interval
/// repeats, so lookups never index out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTable {
    days: &'static [i64],
}

impl IntervalTable {
    /// The table used for every user: 1, 3, 7, 14, 30, then 90 days forever.
    pub const DEFAULT: Self = Self {
        days: &REVIEW_INTERVALS_DAYS,
    };

    /// Number of distinct intervals in the table.
    pub const fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the table holds no intervals at all.
    pub const fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Get the interval in days for a given repetition count.
    ///
    /// Negative counts are treated as a fresh schedule.
    pub fn interval_days(&self, repetition_count: i32) -> i64 {
        let index = usize::try_from(repetition_count).unwrap_or(0);
        self.days[index.min(self.days.len() - 1)]
    }

    /// Same as [`interval_days`](Self::interval_days) as a `chrono::Duration`.
    pub fn interval(&self, repetition_count: i32) -> Duration {
        Duration::days(self.interval_days(repetition_count))
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of marking a problem as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStep {
    /// When the completion happened
    pub reviewed_at: DateTime<Utc>,
    /// Calendar day the problem should be reviewed again
    pub next_review_date: NaiveDate,
    /// Repetition count after this completion
    pub repetition_count: i32,
    /// Interval that was applied, in days
    pub interval_days: i64,
}

/// Compute the schedule produced by one more completion.
///
/// # Arguments
///
/// * `table` - Interval table to read from
/// * `repetition_count` - Completions recorded before this one (0 for a new schedule)
/// * `now` - Time of the completion; its UTC date is "today"
///
/// # Returns
///
/// A [`ReviewStep`] whose `next_review_date` is `today + table[min(count, len - 1)]`
/// and whose `repetition_count` is one higher than the input.
pub fn next_review(table: &IntervalTable, repetition_count: i32, now: DateTime<Utc>) -> ReviewStep {
    let repetition_count = repetition_count.max(0);
    let interval = table.interval(repetition_count);

    ReviewStep {
        reviewed_at: now,
        next_review_date: now.date_naive() + interval,
        repetition_count: repetition_count + 1,
        interval_days: interval.num_days(),
    }
}

/// Whether a review scheduled for `next_review_date` is due on `today`.
pub fn is_due(next_review_date: NaiveDate, today: NaiveDate) -> bool {
    next_review_date <= today
}
