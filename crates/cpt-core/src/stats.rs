//! Dashboard aggregates over a user's active plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Difficulty, ProgressStatus};

/// Completion counts for one slice of problems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub total: u32,
    pub completed: u32,
    pub percentage: u32,
}

impl DifficultyStats {
    fn record(&mut self, status: ProgressStatus) {
        self.total += 1;
        if status == ProgressStatus::Completed {
            self.completed += 1;
        }
    }

    fn finish(mut self) -> Self {
        self.percentage = percentage(self.completed, self.total);
        self
    }
}

/// A scheduled review as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacedRepetitionEntry {
    pub problem_id: Uuid,
    pub problem_name: String,
    pub next_review_date: NaiveDate,
    pub repetitions: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: u32,
    pub completed: u32,
    pub percentage: u32,
    pub easy: DifficultyStats,
    pub medium: DifficultyStats,
    pub hard: DifficultyStats,
    pub spaced_repetition: Vec<SpacedRepetitionEntry>,
}

impl DashboardStats {
    /// Aggregate `(difficulty, status)` pairs of the active plan's problems
    /// and attach the user's reviews, soonest first.
    pub fn collect<I>(progress: I, mut reviews: Vec<SpacedRepetitionEntry>) -> Self
    where
        I: IntoIterator<Item = (Difficulty, ProgressStatus)>,
    {
        let mut overall = DifficultyStats::default();
        let mut easy = DifficultyStats::default();
        let mut medium = DifficultyStats::default();
        let mut hard = DifficultyStats::default();

        for (difficulty, status) in progress {
            overall.record(status);
            match difficulty {
                Difficulty::Easy => easy.record(status),
                Difficulty::Medium => medium.record(status),
                Difficulty::Hard => hard.record(status),
            }
        }

        reviews.sort_by_key(|r| r.next_review_date);
        let overall = overall.finish();

        Self {
            total: overall.total,
            completed: overall.completed,
            percentage: overall.percentage,
            easy: easy.finish(),
            medium: medium.finish(),
            hard: hard.finish(),
            spaced_repetition: reviews,
        }
    }
}

/// Integer completion percentage, rounded down. Zero when `total` is zero.
pub const fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        ((completed as u64 * 100) / total as u64) as u32
    }
}
