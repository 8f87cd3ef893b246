use uuid::Uuid;

use crate::{models::Progress, store::ProgressStore};

/// Return the user's progress on a problem, creating a `pending` record the
/// first time. An existing record is returned as-is: status and note are never
/// reset.
pub async fn ensure_progress<S: ProgressStore>(
    store: &mut S,
    user_id: Uuid,
    problem_id: Uuid,
) -> Result<Progress, S::Error> {
    if let Some(progress) = store.find_progress(user_id, problem_id).await? {
        return Ok(progress);
    }

    tracing::debug!(%user_id, %problem_id, "creating progress record");
    store.create_progress(user_id, problem_id).await
}
