use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use cpt_core::{DailyPlan, PlanRequest, create_plan};
use cpt_db::PgStore;

use crate::{
    ApiState, auth::AuthUser, error::ApiError, metrics::record_plan_created,
    validation::validate_plan_days,
};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/study-plan", post(create_study_plan))
}

/// Replace the caller's plan with a new one and return it day by day.
async fn create_study_plan(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<PlanRequest>,
) -> Result<Json<Vec<DailyPlan>>, ApiError> {
    let days = validate_plan_days(payload.days)?;

    // Dropping the transaction on error restores the previous plan
    let mut tx = state.pool.begin().await?;

    let plan = create_plan(
        &mut PgStore::new(&mut tx),
        auth_user.user_id,
        &payload,
        Utc::now().date_naive(),
    )
    .await?;

    tx.commit().await?;

    let pool_size = plan.iter().map(|day| day.problems.len()).sum();
    record_plan_created(payload.skill_level, days, pool_size);

    Ok(Json(plan))
}
