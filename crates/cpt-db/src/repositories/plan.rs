use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{DailyTaskRow, StudyPlanRow};

/// Lock the user's row until the surrounding transaction ends, serializing
/// concurrent plan replacement for the same user.
pub async fn lock_owner<'e, E>(executor: E, user_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            SELECT id FROM users WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_active<'e, E>(executor: E, user_id: Uuid) -> Result<Option<StudyPlanRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT sp.id, sp.user_id, sp.skill_level, sp.duration_days, sp.created_at,
                   COALESCE(
                       ARRAY(SELECT spt.topic_id FROM study_plan_topics spt WHERE spt.plan_id = sp.id),
                       '{}'
                   ) AS topic_ids
            FROM users u
            JOIN study_plans sp ON sp.id = u.active_plan_id
            WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Delete a plan. Daily tasks and topic links go with it; the owner's
/// active pointer is cleared by the foreign key.
pub async fn delete<'e, E>(executor: E, plan_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM study_plans WHERE id = $1
        "#,
    )
    .bind(plan_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Insert a plan row and return it with empty `topic_ids`.
pub async fn create<'e, E>(
    executor: E,
    user_id: Uuid,
    skill_level: &str,
    duration_days: i32,
) -> Result<StudyPlanRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plans (user_id, skill_level, duration_days)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, skill_level, duration_days, created_at, '{}'::uuid[] AS topic_ids
        "#,
    )
    .bind(user_id)
    .bind(skill_level)
    .bind(duration_days)
    .fetch_one(executor)
    .await
}

pub async fn link_topics<'e, E>(executor: E, plan_id: Uuid, topic_ids: &[Uuid]) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plan_topics (plan_id, topic_id)
            SELECT $1, topic_id FROM UNNEST($2::uuid[]) AS t(topic_id)
            ON CONFLICT DO NOTHING
        "#,
    )
    .bind(plan_id)
    .bind(topic_ids)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn set_active<'e, E>(executor: E, user_id: Uuid, plan_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET active_plan_id = $2, updated_at = NOW()
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(plan_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Batch-insert daily tasks. Rows come back in input order.
pub async fn insert_tasks<'e, E>(
    executor: E,
    plan_id: Uuid,
    problem_ids: &[Uuid],
    day_numbers: &[i32],
) -> Result<Vec<DailyTaskRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH input AS (
                SELECT problem_id, day_number, ord
                FROM UNNEST($2::uuid[], $3::int4[]) WITH ORDINALITY AS t(problem_id, day_number, ord)
            ),
            inserted AS (
                INSERT INTO daily_tasks (plan_id, problem_id, day_number)
                SELECT $1, problem_id, day_number FROM input ORDER BY ord
                RETURNING id, plan_id, problem_id, day_number
            )
            SELECT i.id, i.plan_id, i.problem_id, i.day_number
            FROM inserted i
            JOIN input ON input.problem_id = i.problem_id AND input.day_number = i.day_number
            ORDER BY input.ord
        "#,
    )
    .bind(plan_id)
    .bind(problem_ids)
    .bind(day_numbers)
    .fetch_all(executor)
    .await
}
