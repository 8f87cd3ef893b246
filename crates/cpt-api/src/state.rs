use axum::extract::FromRef;
use cpt_core::ReviewScheduler;
use sqlx::PgPool;

use crate::{ApiConfig, config::Environment};

/// Token settings needed by the auth extractor
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: PgPool,
    pub auth: AuthConfig,
    pub bcrypt_cost: u32,
    pub environment: Environment,
    pub scheduler: ReviewScheduler,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            pool,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                jwt_expiry_hours: config.jwt_expiry_hours,
            },
            bcrypt_cost: config.bcrypt_cost,
            environment: config.env,
            scheduler: ReviewScheduler::default(),
        }
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
