use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ReviewEntryRow, ReviewRow};

pub async fn find_by_progress<'e, E>(executor: E, progress_id: Uuid) -> Result<Option<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, progress_id, last_reviewed_at, next_review_date, repetition_count
            FROM reviews
            WHERE progress_id = $1
        "#,
    )
    .bind(progress_id)
    .fetch_optional(executor)
    .await
}

/// Create the review owned by `progress_id`, or overwrite its schedule.
pub async fn upsert<'e, E>(
    executor: E,
    progress_id: Uuid,
    last_reviewed_at: DateTime<Utc>,
    next_review_date: NaiveDate,
    repetition_count: i32,
) -> Result<ReviewRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO reviews (progress_id, last_reviewed_at, next_review_date, repetition_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT uq_reviews_progress
            DO UPDATE SET
                last_reviewed_at = $2,
                next_review_date = $3,
                repetition_count = $4
            RETURNING id, progress_id, last_reviewed_at, next_review_date, repetition_count
        "#,
    )
    .bind(progress_id)
    .bind(last_reviewed_at)
    .bind(next_review_date)
    .bind(repetition_count)
    .fetch_one(executor)
    .await
}

/// Returns whether a review was deleted.
pub async fn delete_by_progress<'e, E>(executor: E, progress_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM reviews WHERE progress_id = $1
        "#,
    )
    .bind(progress_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Every review the user has, across all plans.
pub async fn list_entries_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<ReviewEntryRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT p.id AS problem_id, p.name AS problem_name, r.next_review_date, r.repetition_count
            FROM reviews r
            JOIN user_problem_progress upp ON upp.id = r.progress_id
            JOIN problems p ON p.id = upp.problem_id
            WHERE upp.user_id = $1
            ORDER BY r.next_review_date, p.name
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
