//! Row shapes read from Postgres and their conversions into engine models.
//!
//! Enum columns are stored as text and checked by the schema; decoding a label
//! the engine does not know surfaces as [`sqlx::Error::Decode`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use cpt_core::models::{
    DailyTask, Difficulty, Problem, Progress, ProgressStatus, ReviewRecord, StudyPlan, Topic,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn decode<T>(label: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = cpt_core::models::ParseEnumError>,
{
    label.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Problem joined with its topic name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProblemRow {
    pub id: Uuid,
    pub name: String,
    pub difficulty: String,
    pub topic_id: Option<Uuid>,
    pub topic_name: Option<String>,
    pub leetcode_id: Option<String>,
    pub custom_link: Option<String>,
    pub is_custom: bool,
    pub created_by: Option<Uuid>,
}

impl TryFrom<ProblemRow> for Problem {
    type Error = sqlx::Error;

    fn try_from(row: ProblemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            difficulty: decode(&row.difficulty)?,
            topic_id: row.topic_id,
            topic: row.topic_name,
            leetcode_id: row.leetcode_id,
            custom_link: row.custom_link,
            is_custom: row.is_custom,
            created_by: row.created_by,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicRow {
    pub id: Uuid,
    pub name: String,
}

impl From<TopicRow> for Topic {
    fn from(row: TopicRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Plan row; topic ids are aggregated from `study_plan_topics`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudyPlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_level: String,
    pub duration_days: i32,
    pub topic_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StudyPlanRow> for StudyPlan {
    type Error = sqlx::Error;

    fn try_from(row: StudyPlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            skill_level: decode(&row.skill_level)?,
            duration_days: row.duration_days,
            topic_ids: row.topic_ids,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyTaskRow {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub problem_id: Uuid,
    pub day_number: i32,
}

impl From<DailyTaskRow> for DailyTask {
    fn from(row: DailyTaskRow) -> Self {
        Self {
            id: row.id,
            plan_id: row.plan_id,
            problem_id: row.problem_id,
            day_number: row.day_number,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for Progress {
    type Error = sqlx::Error;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            problem_id: row.problem_id,
            status: decode(&row.status)?,
            notes: row.notes,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub progress_id: Uuid,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_date: NaiveDate,
    pub repetition_count: i32,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            progress_id: row.progress_id,
            last_reviewed_at: row.last_reviewed_at,
            next_review_date: row.next_review_date,
            repetition_count: row.repetition_count,
        }
    }
}

/// Public account fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Account fields needed to check a password
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub password_hash: String,
}

impl From<UserCredentials> for UserProfile {
    fn from(creds: UserCredentials) -> Self {
        Self {
            id: creds.id,
            name: creds.name,
            email: creds.email,
            avatar_url: creds.avatar_url,
        }
    }
}

/// Difficulty and status of one progress record in the active plan
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanProgressRow {
    pub difficulty: String,
    pub status: String,
}

impl PlanProgressRow {
    pub fn decode(&self) -> Result<(Difficulty, ProgressStatus), sqlx::Error> {
        Ok((decode(&self.difficulty)?, decode(&self.status)?))
    }
}

/// A user's review joined with the problem it tracks
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewEntryRow {
    pub problem_id: Uuid,
    pub problem_name: String,
    pub next_review_date: NaiveDate,
    pub repetition_count: i32,
}

impl From<ReviewEntryRow> for cpt_core::stats::SpacedRepetitionEntry {
    fn from(row: ReviewEntryRow) -> Self {
        Self {
            problem_id: row.problem_id,
            problem_name: row.problem_name,
            next_review_date: row.next_review_date,
            repetitions: row.repetition_count,
        }
    }
}
