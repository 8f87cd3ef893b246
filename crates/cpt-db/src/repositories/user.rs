use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{UserCredentials, UserProfile};

pub async fn find_profile_by_id<'e, E>(executor: E, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, email, avatar_url
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_credentials_by_email<'e, E>(
    executor: E,
    email: &str,
) -> Result<Option<UserCredentials>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, email, avatar_url, password_hash
            FROM users
            WHERE lower(email) = lower($1)
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn email_exists<'e, E>(executor: E, email: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))
        "#,
    )
    .bind(email)
    .fetch_one(executor)
    .await
}

pub async fn create<'e, E>(
    executor: E,
    name: &str,
    email: &str,
    password_hash: &str,
    avatar_url: Option<&str>,
) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (name, email, password_hash, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, avatar_url
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(avatar_url)
    .fetch_one(executor)
    .await
}
