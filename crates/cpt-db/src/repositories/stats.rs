use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::PlanProgressRow;

/// Difficulty and status of the user's progress on each distinct problem of
/// their active plan. Empty when there is no active plan.
pub async fn active_plan_progress<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<PlanProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT p.difficulty, upp.status
            FROM users u
            JOIN daily_tasks dt ON dt.plan_id = u.active_plan_id
            JOIN problems p ON p.id = dt.problem_id
            JOIN user_problem_progress upp ON upp.user_id = u.id AND upp.problem_id = p.id
            WHERE u.id = $1
            GROUP BY p.id, p.difficulty, upp.status
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
