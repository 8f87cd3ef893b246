//! Persistence collaborators consumed by the engine.
//!
//! Every method takes `&mut self` so an implementation can wrap a single
//! database transaction; the engine never assumes anything is committed
//! until the caller commits it.

use std::future::Future;

use uuid::Uuid;

use crate::models::{
    DailyTask, Difficulty, NewDailyTask, NewStudyPlan, Problem, Progress, ReviewRecord,
    ReviewUpsert, StudyPlan, Topic,
};

/// Shared error type of a store.
pub trait Store: Send {
    /// Failure reported by every operation of the store.
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Read access to the problem catalog.
pub trait ProblemCatalog: Store {
    /// Problems of one difficulty. `topic_ids = None` means no topic filter;
    /// otherwise only problems filed under one of the given topics.
    fn find_problems(
        &mut self,
        difficulty: Difficulty,
        topic_ids: Option<&[Uuid]>,
    ) -> impl Future<Output = Result<Vec<Problem>, Self::Error>> + Send;

    /// A single problem by id, `None` when it does not exist.
    fn find_problem(
        &mut self,
        problem_id: Uuid,
    ) -> impl Future<Output = Result<Option<Problem>, Self::Error>> + Send;

    /// Topics whose names match any of `names` (already normalized).
    /// Unknown names are simply absent from the result.
    fn find_topics_by_name(
        &mut self,
        names: &[String],
    ) -> impl Future<Output = Result<Vec<Topic>, Self::Error>> + Send;
}

/// Progress and review records.
pub trait ProgressStore: Store {
    /// The user's progress on a problem, `None` if it was never assigned.
    fn find_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> impl Future<Output = Result<Option<Progress>, Self::Error>> + Send;

    /// Insert a `pending` progress without a note.
    fn create_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> impl Future<Output = Result<Progress, Self::Error>> + Send;

    /// Persist `status` and `notes` of an existing progress.
    fn update_progress(
        &mut self,
        progress: &Progress,
    ) -> impl Future<Output = Result<Progress, Self::Error>> + Send;

    /// The review owned by `progress_id`, if the problem is completed.
    fn find_review(
        &mut self,
        progress_id: Uuid,
    ) -> impl Future<Output = Result<Option<ReviewRecord>, Self::Error>> + Send;

    /// Create or overwrite the single review owned by `review.progress_id`.
    fn save_review(
        &mut self,
        review: &ReviewUpsert,
    ) -> impl Future<Output = Result<ReviewRecord, Self::Error>> + Send;

    /// Delete the review owned by `progress_id`. Returns whether one existed.
    fn delete_review(
        &mut self,
        progress_id: Uuid,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Study plans and their daily tasks.
pub trait PlanStore: ProblemCatalog + ProgressStore {
    /// Serialize plan replacement for one user until the surrounding unit of
    /// work ends.
    fn lock_plan_owner(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// The plan the user's active pointer refers to.
    fn find_active_plan(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<StudyPlan>, Self::Error>> + Send;

    /// Delete a plan together with its daily tasks. Progress is untouched.
    fn delete_plan(&mut self, plan_id: Uuid)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Insert a plan with its topic links.
    fn create_plan(
        &mut self,
        plan: &NewStudyPlan,
    ) -> impl Future<Output = Result<StudyPlan, Self::Error>> + Send;

    /// Point the user at `plan_id`.
    fn set_active_plan(
        &mut self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Insert all tasks of a plan in one batch, returned in input order.
    fn save_tasks(
        &mut self,
        plan_id: Uuid,
        tasks: &[NewDailyTask],
    ) -> impl Future<Output = Result<Vec<DailyTask>, Self::Error>> + Send;
}
