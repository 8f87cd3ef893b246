//! Account creation and password login.

use cpt_db::{models::UserProfile, repositories::user};
use sqlx::PgPool;

use crate::{error::ApiError, metrics::record_auth_event};

const UNIQUE_VIOLATION: &str = "23505";

/// Generated avatar for a display name
pub fn avatar_url(name: &str) -> String {
    let encoded = name.split_whitespace().collect::<Vec<_>>().join("+");
    format!("https://ui-avatars.com/api/?name={encoded}&background=3b82f6&color=ffffff")
}

/// Lowercase, trimmed form under which emails are stored
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account. Inputs must already be validated.
///
/// Fails with `Conflict` when the email is taken, including when a concurrent
/// signup wins the race on the unique index.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<UserProfile, ApiError> {
    let mut tx = pool.begin().await?;

    if user::email_exists(&mut *tx, email).await? {
        record_auth_event("signup", false);
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(password.to_string(), bcrypt_cost).await?;
    let avatar = avatar_url(name);

    let profile = user::create(&mut *tx, name.trim(), email, &password_hash, Some(&avatar))
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                ApiError::Conflict("Email is already registered".to_string())
            }
            other => ApiError::Database(other),
        })?;

    tx.commit().await?;

    record_auth_event("signup", true);
    tracing::info!(user_id = %profile.id, "user registered");

    Ok(profile)
}

/// Check an email and password pair.
///
/// Unknown email and wrong password produce the same error.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<UserProfile, ApiError> {
    let invalid = || ApiError::Auth("Invalid email or password".to_string());

    let Some(credentials) = user::find_credentials_by_email(pool, email).await? else {
        record_auth_event("login", false);
        return Err(invalid());
    };

    if !verify_password(password.to_string(), credentials.password_hash.clone()).await? {
        record_auth_event("login", false);
        tracing::debug!(user_id = %credentials.id, "password mismatch");
        return Err(invalid());
    }

    record_auth_event("login", true);
    Ok(credentials.into())
}

// bcrypt is CPU bound; keep it off the async workers
async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))??;
    Ok(matches)
}
