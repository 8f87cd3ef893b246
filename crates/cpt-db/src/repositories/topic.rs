use sqlx::{Executor, Postgres};

use crate::models::TopicRow;

/// Topics matching any of `names`, compared case-insensitively.
pub async fn find_by_names<'e, E>(executor: E, names: &[String]) -> Result<Vec<TopicRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name
            FROM topics
            WHERE lower(name) = ANY(SELECT lower(n) FROM UNNEST($1::text[]) AS n)
            ORDER BY name
        "#,
    )
    .bind(names)
    .fetch_all(executor)
    .await
}

/// Return the topic named `name`, creating it if needed.
///
/// The no-op update makes `RETURNING` yield the existing row on conflict.
pub async fn find_or_create<'e, E>(executor: E, name: &str) -> Result<TopicRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO topics (name)
            VALUES ($1)
            ON CONFLICT ((lower(name)))
            DO UPDATE SET name = topics.name
            RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

/// Every topic, alphabetically.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<TopicRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name
            FROM topics
            ORDER BY name
        "#,
    )
    .fetch_all(executor)
    .await
}
