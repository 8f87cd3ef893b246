//! Spaced-repetition state machine driven by completion toggles.
//!
//! A progress record is either `pending` (no review) or `completed` (exactly one
//! review). Completing advances the schedule along the interval table;
//! un-completing deletes the review, so the next completion starts over at
//! repetition 0.

use chrono::{DateTime, Utc};
use cpt_srs::IntervalTable;
use uuid::Uuid;

use crate::{
    error::EngineError,
    models::{Progress, ProgressStatus, ReviewUpsert},
    store::{ProblemCatalog, ProgressStore},
    summary::ProblemSummary,
};

/// Drives review records for toggle and note requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewScheduler {
    intervals: IntervalTable,
}

impl ReviewScheduler {
    /// Scheduler stepping through `intervals` on each completion.
    pub const fn new(intervals: IntervalTable) -> Self {
        Self { intervals }
    }

    /// Flip the user's status on a problem and advance or reset its review.
    ///
    /// Fails with [`EngineError::ProgressNotFound`] when the problem was never
    /// assigned to the user.
    pub async fn toggle<S>(
        &self,
        store: &mut S,
        user_id: Uuid,
        problem_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ProblemSummary, EngineError<S::Error>>
    where
        S: ProgressStore + ProblemCatalog,
    {
        let mut progress = find_owned_progress(store, user_id, problem_id).await?;

        match progress.status {
            ProgressStatus::Pending => self.complete(store, &progress, now).await?,
            ProgressStatus::Completed => {
                let removed = store.delete_review(progress.id).await?;
                tracing::debug!(progress_id = %progress.id, removed, "review schedule reset");
            }
        }

        progress.status = progress.status.toggled();
        let progress = store.update_progress(&progress).await?;

        tracing::info!(
            %user_id,
            %problem_id,
            status = %progress.status,
            "problem status toggled"
        );

        summarize(store, &progress).await
    }

    /// Replace the user's note on a problem. Status and review are untouched.
    pub async fn update_note<S>(
        &self,
        store: &mut S,
        user_id: Uuid,
        problem_id: Uuid,
        note: String,
    ) -> Result<ProblemSummary, EngineError<S::Error>>
    where
        S: ProgressStore + ProblemCatalog,
    {
        let mut progress = find_owned_progress(store, user_id, problem_id).await?;
        progress.notes = Some(note);
        let progress = store.update_progress(&progress).await?;

        summarize(store, &progress).await
    }

    async fn complete<S: ProgressStore>(
        &self,
        store: &mut S,
        progress: &Progress,
        now: DateTime<Utc>,
    ) -> Result<(), S::Error> {
        let repetition_count = store
            .find_review(progress.id)
            .await?
            .map_or(0, |review| review.repetition_count);

        let step = cpt_srs::next_review(&self.intervals, repetition_count, now);

        store
            .save_review(&ReviewUpsert {
                progress_id: progress.id,
                last_reviewed_at: step.reviewed_at,
                next_review_date: step.next_review_date,
                repetition_count: step.repetition_count,
            })
            .await?;

        tracing::debug!(
            progress_id = %progress.id,
            interval_days = step.interval_days,
            next_review_date = %step.next_review_date,
            repetition_count = step.repetition_count,
            "review scheduled"
        );

        Ok(())
    }
}

async fn find_owned_progress<S: ProgressStore>(
    store: &mut S,
    user_id: Uuid,
    problem_id: Uuid,
) -> Result<Progress, EngineError<S::Error>> {
    store
        .find_progress(user_id, problem_id)
        .await?
        .ok_or(EngineError::ProgressNotFound { problem_id })
}

async fn summarize<S: ProblemCatalog>(
    store: &mut S,
    progress: &Progress,
) -> Result<ProblemSummary, EngineError<S::Error>> {
    let Some(problem) = store.find_problem(progress.problem_id).await? else {
        return Err(EngineError::ProblemNotFound {
            problem_id: progress.problem_id,
        });
    };

    Ok(ProblemSummary::new(&problem, Some(progress)))
}
