use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Problem difficulty as labelled in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Every difficulty, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Catalog label, as stored and serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            other => Err(ParseEnumError::new("difficulty", other)),
        }
    }
}

/// Coarse preference tier chosen by the user when requesting a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Pro,
}

impl SkillLevel {
    /// Every level, in declaration order.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Pro];

    /// Wire name used in requests and storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "pro" => Ok(Self::Pro),
            other => Err(ParseEnumError::new("skill level", other)),
        }
    }
}

/// Completion status held on a progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    #[default]
    Pending,
    Completed,
}

impl ProgressStatus {
    /// Wire name used in responses and storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// The status a toggle request moves to.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParseEnumError::new("progress status", other)),
        }
    }
}

/// Returned when a stored label does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Practice problem from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    /// Topic the problem is filed under, if any
    pub topic_id: Option<Uuid>,
    /// Denormalized topic name for display
    pub topic: Option<String>,
    pub leetcode_id: Option<String>,
    pub custom_link: Option<String>,
    /// User-submitted rather than seeded
    pub is_custom: bool,
    /// Author of a custom problem
    pub created_by: Option<Uuid>,
}

/// Named grouping of problems. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
}

/// A user's study plan. Daily tasks are stored separately and keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_level: SkillLevel,
    pub duration_days: i32,
    pub topic_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for [`StudyPlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudyPlan {
    pub user_id: Uuid,
    pub skill_level: SkillLevel,
    pub duration_days: i32,
    pub topic_ids: Vec<Uuid>,
}

/// One problem scheduled on one day of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub problem_id: Uuid,
    /// 1-based, never above the plan duration
    pub day_number: i32,
}

/// Insert shape for [`DailyTask`]; the owning plan is passed alongside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDailyTask {
    pub problem_id: Uuid,
    pub day_number: i32,
}

/// Per-user, per-problem completion record. Independent of any plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub status: ProgressStatus,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Spaced-repetition state of a completed progress record.
///
/// Owned through `progress_id` only; a progress has at most one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub progress_id: Uuid,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_date: NaiveDate,
    pub repetition_count: i32,
}

/// Upsert shape for [`ReviewRecord`], keyed by `progress_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewUpsert {
    pub progress_id: Uuid,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_date: NaiveDate,
    pub repetition_count: i32,
}
