use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ProgressRow;

pub async fn find<'e, E>(
    executor: E,
    user_id: Uuid,
    problem_id: Uuid,
) -> Result<Option<ProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, problem_id, status, notes, updated_at
            FROM user_problem_progress
            WHERE user_id = $1 AND problem_id = $2
        "#,
    )
    .bind(user_id)
    .bind(problem_id)
    .fetch_optional(executor)
    .await
}

/// Insert a `pending` record. An existing record for the pair is returned
/// unchanged instead of failing on the unique constraint.
pub async fn create<'e, E>(executor: E, user_id: Uuid, problem_id: Uuid) -> Result<ProgressRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_problem_progress (user_id, problem_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT uq_progress_user_problem
            DO UPDATE SET user_id = user_problem_progress.user_id
            RETURNING id, user_id, problem_id, status, notes, updated_at
        "#,
    )
    .bind(user_id)
    .bind(problem_id)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(
    executor: E,
    progress_id: Uuid,
    status: &str,
    notes: Option<&str>,
) -> Result<ProgressRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE user_problem_progress
            SET status = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, problem_id, status, notes, updated_at
        "#,
    )
    .bind(progress_id)
    .bind(status)
    .bind(notes)
    .fetch_one(executor)
    .await
}
