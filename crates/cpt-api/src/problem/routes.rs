use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use chrono::Utc;
use cpt_core::{
    DashboardStats, ProblemSummary,
    models::Difficulty,
    normalization::normalize_topic_name,
    progress::ensure_progress,
    stats::SpacedRepetitionEntry,
    store::ProblemCatalog,
};
use cpt_db::{
    PgStore,
    repositories::{
        problem::{self, NewCustomProblem},
        review, stats, topic,
    },
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics::record_status_toggle,
    validation::{optional_field, require_non_blank},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/problems/{problem_id}/status", patch(toggle_status))
        .route("/problems/{problem_id}/notes", put(update_note))
        .route("/problems/custom", post(create_custom_problem))
        .route("/problems/dashboard-stats", get(dashboard_stats))
}

#[derive(Debug, Deserialize)]
struct NoteRequest {
    note: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomProblemRequest {
    name: String,
    difficulty: Difficulty,
    topic: String,
    leetcode_id: Option<String>,
    custom_link: Option<String>,
}

/// Flip pending/completed and advance or reset the review schedule.
async fn toggle_status(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<Uuid>,
) -> Result<Json<ProblemSummary>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let summary = state
        .scheduler
        .toggle(
            &mut PgStore::new(&mut tx),
            auth_user.user_id,
            problem_id,
            Utc::now(),
        )
        .await?;

    tx.commit().await?;
    record_status_toggle(summary.status);

    Ok(Json(summary))
}

async fn update_note(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<ProblemSummary>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let summary = state
        .scheduler
        .update_note(
            &mut PgStore::new(&mut tx),
            auth_user.user_id,
            problem_id,
            payload.note,
        )
        .await?;

    tx.commit().await?;

    Ok(Json(summary))
}

/// Add a user-authored problem and start tracking it for the author.
async fn create_custom_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CustomProblemRequest>,
) -> Result<(StatusCode, Json<ProblemSummary>), ApiError> {
    let name = require_non_blank("Name", &payload.name)?;
    let topic_name = normalize_topic_name(require_non_blank("Topic", &payload.topic)?);
    let leetcode_id = optional_field("LeetCode id", payload.leetcode_id.as_deref())?;
    let custom_link = optional_field("Custom link", payload.custom_link.as_deref())?;

    let mut tx = state.pool.begin().await?;

    let topic = topic::find_or_create(&mut *tx, &topic_name).await?;
    let problem_id = problem::create_custom(
        &mut *tx,
        NewCustomProblem {
            name,
            difficulty: payload.difficulty.as_str(),
            topic_id: topic.id,
            leetcode_id,
            custom_link,
            created_by: auth_user.user_id,
        },
    )
    .await?;

    let mut store = PgStore::new(&mut tx);
    let progress = ensure_progress(&mut store, auth_user.user_id, problem_id).await?;
    let problem = store
        .find_problem(problem_id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("custom problem {problem_id} vanished")))?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        %problem_id,
        topic = %topic.name,
        "custom problem created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ProblemSummary::new(&problem, Some(&progress))),
    ))
}

/// Completion counts over the active plan plus every scheduled review.
async fn dashboard_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let progress = stats::active_plan_progress(&state.pool, auth_user.user_id)
        .await?
        .iter()
        .map(|row| row.decode())
        .collect::<Result<Vec<_>, _>>()?;

    let reviews = review::list_entries_for_user(&state.pool, auth_user.user_id)
        .await?
        .into_iter()
        .map(SpacedRepetitionEntry::from)
        .collect();

    Ok(Json(DashboardStats::collect(progress, reviews)))
}
