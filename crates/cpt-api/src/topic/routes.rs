use axum::{Json, Router, extract::State, routing::get};
use cpt_core::models::Topic;
use cpt_db::repositories::topic;

use crate::{ApiState, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/topics", get(list_topics))
}

async fn list_topics(State(state): State<ApiState>) -> Result<Json<Vec<Topic>>, ApiError> {
    let topics = topic::list_all(&state.pool)
        .await?
        .into_iter()
        .map(Topic::from)
        .collect();

    Ok(Json(topics))
}
