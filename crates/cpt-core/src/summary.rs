//! Response shapes assembled by the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Difficulty, Problem, Progress, ProgressStatus};

/// Topic label used when a problem is not filed under any topic.
pub const DEFAULT_TOPIC: &str = "General";

/// Calendar format of [`DailyPlan::date`], e.g. `Mon, Oct 19, 26`.
pub const PLAN_DATE_FORMAT: &str = "%a, %b %d, %y";

/// A problem as seen by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub status: ProgressStatus,
    pub leetcode_id: Option<String>,
    pub custom_link: Option<String>,
    pub is_custom: bool,
    pub notes: String,
}

impl ProblemSummary {
    /// Merge catalog data with the user's progress. Missing progress reads as
    /// `pending` with an empty note.
    pub fn new(problem: &Problem, progress: Option<&Progress>) -> Self {
        Self {
            id: problem.id,
            name: problem.name.clone(),
            difficulty: problem.difficulty,
            topic: problem
                .topic
                .clone()
                .unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            status: progress.map(|p| p.status).unwrap_or_default(),
            leetcode_id: problem.leetcode_id.clone(),
            custom_link: problem.custom_link.clone(),
            is_custom: problem.is_custom,
            notes: progress
                .and_then(|p| p.notes.clone())
                .unwrap_or_default(),
        }
    }
}

/// One day of a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub day: i32,
    pub date: String,
    pub problems: Vec<ProblemSummary>,
}

/// Calendar date of plan day `day` (1-based) for a plan starting `today`.
pub fn plan_day_date(today: NaiveDate, day: i32) -> NaiveDate {
    today + chrono::Duration::days(i64::from(day - 1))
}

/// Render a plan date the way clients display it, e.g. `Mon, Oct 19, 26`.
pub fn format_plan_date(date: NaiveDate) -> String {
    date.format(PLAN_DATE_FORMAT).to_string()
}
