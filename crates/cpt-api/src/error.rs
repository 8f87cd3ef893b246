use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cpt_core::{
    EngineError,
    plan::{MAX_PLAN_DAYS, MIN_PLAN_DAYS},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate resource
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Jwt(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and reported generically
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            Self::Jwt(e) => {
                tracing::error!(error = %e, "token error");
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<EngineError<sqlx::Error>> for ApiError {
    fn from(err: EngineError<sqlx::Error>) -> Self {
        match err {
            EngineError::ProgressNotFound { .. } => {
                Self::NotFound("Progress not found for this problem".to_string())
            }
            EngineError::ProblemNotFound { .. } => Self::NotFound("Problem not found".to_string()),
            EngineError::InvalidDuration { .. } => Self::Validation(format!(
                "Days must be between {MIN_PLAN_DAYS} and {MAX_PLAN_DAYS}"
            )),
            EngineError::Store(e) => Self::Database(e),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Auth("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_engine_errors_map_to_not_found() {
        let err: ApiError = EngineError::<sqlx::Error>::ProgressNotFound {
            problem_id: Uuid::new_v4(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = EngineError::Store(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[test]
    fn test_invalid_duration_is_bad_request() {
        let err: ApiError = EngineError::<sqlx::Error>::InvalidDuration { days: -1 }.into();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_message_is_generic() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
