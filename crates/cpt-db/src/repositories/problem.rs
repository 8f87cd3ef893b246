use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ProblemRow;

/// Problems of one difficulty, optionally restricted to a set of topics.
pub async fn find_by_difficulty<'e, E>(
    executor: E,
    difficulty: &str,
    topic_ids: Option<&[Uuid]>,
) -> Result<Vec<ProblemRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT p.id, p.name, p.difficulty, p.topic_id, t.name AS topic_name,
                   p.leetcode_id, p.custom_link, p.is_custom, p.created_by
            FROM problems p
            LEFT JOIN topics t ON t.id = p.topic_id
            WHERE p.difficulty = $1
              AND ($2::uuid[] IS NULL OR p.topic_id = ANY($2))
            ORDER BY p.created_at, p.id
        "#,
    )
    .bind(difficulty)
    .bind(topic_ids)
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, problem_id: Uuid) -> Result<Option<ProblemRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT p.id, p.name, p.difficulty, p.topic_id, t.name AS topic_name,
                   p.leetcode_id, p.custom_link, p.is_custom, p.created_by
            FROM problems p
            LEFT JOIN topics t ON t.id = p.topic_id
            WHERE p.id = $1
        "#,
    )
    .bind(problem_id)
    .fetch_optional(executor)
    .await
}

/// Fields of a user-submitted problem
#[derive(Debug, Clone, Copy)]
pub struct NewCustomProblem<'a> {
    pub name: &'a str,
    pub difficulty: &'a str,
    pub topic_id: Uuid,
    pub leetcode_id: Option<&'a str>,
    pub custom_link: Option<&'a str>,
    pub created_by: Uuid,
}

/// Insert a custom problem and return its id.
pub async fn create_custom<'e, E>(
    executor: E,
    problem: NewCustomProblem<'_>,
) -> Result<Uuid, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO problems (name, difficulty, topic_id, leetcode_id, custom_link, is_custom, created_by)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING id
        "#,
    )
    .bind(problem.name)
    .bind(problem.difficulty)
    .bind(problem.topic_id)
    .bind(problem.leetcode_id)
    .bind(problem.custom_link)
    .bind(problem.created_by)
    .fetch_one(executor)
    .await
}
