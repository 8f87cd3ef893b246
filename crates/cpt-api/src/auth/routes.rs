use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use cpt_db::{models::UserProfile, repositories::user};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    jwt::generate_jwt_token,
    middleware::AuthUser,
    service,
    validation::{validate_email, validate_name, validate_password},
};
use crate::{error::ApiError, state::ApiState};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(auth_me))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            avatar_url: profile.avatar_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn issue(state: &ApiState, profile: UserProfile) -> Result<AuthResponse, ApiError> {
    let token = generate_jwt_token(
        profile.id,
        profile.email.clone(),
        &state.auth.jwt_secret,
        state.auth.jwt_expiry_hours,
    )?;

    Ok(AuthResponse {
        token,
        user: profile.into(),
    })
}

async fn signup(
    State(state): State<ApiState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = service::normalize_email(&payload.email);
    validate_name(&payload.name)?;
    validate_email(&email)?;
    validate_password(&payload.password)?;

    let profile = service::register(
        &state.pool,
        &payload.name,
        &email,
        &payload.password,
        state.bcrypt_cost,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(issue(&state, profile)?)))
}

async fn login(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = service::normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let profile = service::authenticate(&state.pool, &email, &payload.password).await?;

    Ok(Json(issue(&state, profile)?))
}

async fn auth_me(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserResponse>, ApiError> {
    // A valid token for a deleted account is still unauthenticated
    let profile = user::find_profile_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    Ok(Json(profile.into()))
}
