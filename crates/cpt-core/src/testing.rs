//! In-memory store for exercising the engine without a database, and a
//! wrapper that injects store failures.

use std::{collections::HashMap, convert::Infallible, fmt};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{
        DailyTask, Difficulty, NewDailyTask, NewStudyPlan, Problem, Progress, ProgressStatus,
        ReviewRecord, ReviewUpsert, StudyPlan, Topic,
    },
    store::{PlanStore, ProblemCatalog, ProgressStore, Store},
};

/// Single-threaded stand-in for the Postgres store. Nothing ever fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// User id to active plan id
    users: HashMap<Uuid, Option<Uuid>>,
    topics: Vec<Topic>,
    problems: Vec<Problem>,
    plans: HashMap<Uuid, StudyPlan>,
    tasks: Vec<DailyTask>,
    progress: Vec<Progress>,
    reviews: Vec<ReviewRecord>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user without a plan.
    pub fn add_user(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.users.insert(id, None);
        id
    }

    /// Find or create a topic by exact name.
    pub fn add_topic(&mut self, name: &str) -> Uuid {
        if let Some(topic) = self.topics.iter().find(|t| t.name == name) {
            return topic.id;
        }
        let id = Uuid::new_v4();
        self.topics.push(Topic {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Add a catalog problem, creating its topic on first use.
    pub fn add_problem(&mut self, name: &str, difficulty: Difficulty, topic: Option<&str>) -> Uuid {
        let topic_id = topic.map(|t| self.add_topic(t));
        let id = Uuid::new_v4();
        self.problems.push(Problem {
            id,
            name: name.to_string(),
            difficulty,
            topic_id,
            topic: topic.map(str::to_string),
            leetcode_id: None,
            custom_link: None,
            is_custom: false,
            created_by: None,
        });
        id
    }

    /// Drop catalog entries that fail `keep`. Progress and reviews are left alone.
    pub fn retain_problems<F: FnMut(&Problem) -> bool>(&mut self, keep: F) {
        self.problems.retain(keep);
    }

    /// Give the user a `pending` progress on the problem, as a plan would.
    pub fn assign(&mut self, user_id: Uuid, problem_id: Uuid) -> Uuid {
        if let Some(p) = self.progress_of(user_id, problem_id) {
            return p.id;
        }
        let progress = new_progress(user_id, problem_id);
        let id = progress.id;
        self.progress.push(progress);
        id
    }

    /// Overwrite a status directly, bypassing the review bookkeeping.
    pub fn force_status(&mut self, user_id: Uuid, problem_id: Uuid, status: ProgressStatus) {
        if let Some(p) = self
            .progress
            .iter_mut()
            .find(|p| p.user_id == user_id && p.problem_id == problem_id)
        {
            p.status = status;
        }
    }

    /// The review attached to the user's progress on `problem_id`, if any.
    pub fn review_for(&self, user_id: Uuid, problem_id: Uuid) -> Option<ReviewRecord> {
        let progress = self.progress_of(user_id, problem_id)?;
        self.reviews
            .iter()
            .find(|r| r.progress_id == progress.id)
            .cloned()
    }

    /// Reviews across all users.
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Progress records owned by `user_id`.
    pub fn progress_count(&self, user_id: Uuid) -> usize {
        self.progress.iter().filter(|p| p.user_id == user_id).count()
    }

    /// Daily tasks across all plans.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Daily tasks of one plan, in insertion order.
    pub fn tasks_of(&self, plan_id: Uuid) -> Vec<DailyTask> {
        self.tasks
            .iter()
            .filter(|t| t.plan_id == plan_id)
            .cloned()
            .collect()
    }

    /// The user's active plan, if any.
    pub fn active_plan(&self, user_id: Uuid) -> Option<StudyPlan> {
        let plan_id = (*self.users.get(&user_id)?)?;
        self.plans.get(&plan_id).cloned()
    }

    /// Whether the plan is still stored.
    pub fn plan_exists(&self, plan_id: Uuid) -> bool {
        self.plans.contains_key(&plan_id)
    }

    fn progress_of(&self, user_id: Uuid, problem_id: Uuid) -> Option<&Progress> {
        self.progress
            .iter()
            .find(|p| p.user_id == user_id && p.problem_id == problem_id)
    }
}

fn new_progress(user_id: Uuid, problem_id: Uuid) -> Progress {
    Progress {
        id: Uuid::new_v4(),
        user_id,
        problem_id,
        status: ProgressStatus::Pending,
        notes: None,
        updated_at: Utc::now(),
    }
}

impl Store for MemoryStore {
    type Error = Infallible;
}

impl ProblemCatalog for MemoryStore {
    async fn find_problems(
        &mut self,
        difficulty: Difficulty,
        topic_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Problem>, Infallible> {
        Ok(self
            .problems
            .iter()
            .filter(|p| p.difficulty == difficulty)
            .filter(|p| match topic_ids {
                None => true,
                Some(ids) => p.topic_id.is_some_and(|t| ids.contains(&t)),
            })
            .cloned()
            .collect())
    }

    async fn find_problem(&mut self, problem_id: Uuid) -> Result<Option<Problem>, Infallible> {
        Ok(self.problems.iter().find(|p| p.id == problem_id).cloned())
    }

    async fn find_topics_by_name(&mut self, names: &[String]) -> Result<Vec<Topic>, Infallible> {
        Ok(self
            .topics
            .iter()
            .filter(|t| names.iter().any(|n| n.eq_ignore_ascii_case(&t.name)))
            .cloned()
            .collect())
    }
}

impl ProgressStore for MemoryStore {
    async fn find_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> Result<Option<Progress>, Infallible> {
        Ok(self.progress_of(user_id, problem_id).cloned())
    }

    async fn create_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> Result<Progress, Infallible> {
        let progress = new_progress(user_id, problem_id);
        self.progress.push(progress.clone());
        Ok(progress)
    }

    async fn update_progress(&mut self, progress: &Progress) -> Result<Progress, Infallible> {
        let mut updated = progress.clone();
        updated.updated_at = Utc::now();
        match self.progress.iter_mut().find(|p| p.id == progress.id) {
            Some(existing) => *existing = updated.clone(),
            None => self.progress.push(updated.clone()),
        }
        Ok(updated)
    }

    async fn find_review(&mut self, progress_id: Uuid) -> Result<Option<ReviewRecord>, Infallible> {
        Ok(self
            .reviews
            .iter()
            .find(|r| r.progress_id == progress_id)
            .cloned())
    }

    async fn save_review(&mut self, review: &ReviewUpsert) -> Result<ReviewRecord, Infallible> {
        if let Some(existing) = self
            .reviews
            .iter_mut()
            .find(|r| r.progress_id == review.progress_id)
        {
            existing.last_reviewed_at = review.last_reviewed_at;
            existing.next_review_date = review.next_review_date;
            existing.repetition_count = review.repetition_count;
            return Ok(existing.clone());
        }

        let record = ReviewRecord {
            id: Uuid::new_v4(),
            progress_id: review.progress_id,
            last_reviewed_at: review.last_reviewed_at,
            next_review_date: review.next_review_date,
            repetition_count: review.repetition_count,
        };
        self.reviews.push(record.clone());
        Ok(record)
    }

    async fn delete_review(&mut self, progress_id: Uuid) -> Result<bool, Infallible> {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.progress_id != progress_id);
        Ok(self.reviews.len() != before)
    }
}

impl PlanStore for MemoryStore {
    async fn lock_plan_owner(&mut self, user_id: Uuid) -> Result<(), Infallible> {
        self.users.entry(user_id).or_default();
        Ok(())
    }

    async fn find_active_plan(&mut self, user_id: Uuid) -> Result<Option<StudyPlan>, Infallible> {
        Ok(self.active_plan(user_id))
    }

    async fn delete_plan(&mut self, plan_id: Uuid) -> Result<(), Infallible> {
        self.plans.remove(&plan_id);
        self.tasks.retain(|t| t.plan_id != plan_id);
        for active in self.users.values_mut() {
            if *active == Some(plan_id) {
                *active = None;
            }
        }
        Ok(())
    }

    async fn create_plan(&mut self, plan: &NewStudyPlan) -> Result<StudyPlan, Infallible> {
        let created = StudyPlan {
            id: Uuid::new_v4(),
            user_id: plan.user_id,
            skill_level: plan.skill_level,
            duration_days: plan.duration_days,
            topic_ids: plan.topic_ids.clone(),
            created_at: Utc::now(),
        };
        self.plans.insert(created.id, created.clone());
        Ok(created)
    }

    async fn set_active_plan(&mut self, user_id: Uuid, plan_id: Uuid) -> Result<(), Infallible> {
        self.users.insert(user_id, Some(plan_id));
        Ok(())
    }

    async fn save_tasks(
        &mut self,
        plan_id: Uuid,
        tasks: &[NewDailyTask],
    ) -> Result<Vec<DailyTask>, Infallible> {
        let saved: Vec<DailyTask> = tasks
            .iter()
            .map(|t| DailyTask {
                id: Uuid::new_v4(),
                plan_id,
                problem_id: t.problem_id,
                day_number: t.day_number,
            })
            .collect();
        self.tasks.extend(saved.iter().cloned());
        Ok(saved)
    }
}

/// Error of a [`FailingStore`].
#[derive(Debug)]
pub enum StoreFailure<E> {
    /// The operation the store was told to fail on was reached.
    Injected(&'static str),
    /// The wrapped store failed on its own.
    Inner(E),
}

impl<E: fmt::Display> fmt::Display for StoreFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Injected(operation) => write!(f, "injected failure in {operation}"),
            Self::Inner(e) => e.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for StoreFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Injected(_) => None,
            Self::Inner(e) => Some(e),
        }
    }
}

/// Wraps another store, records every call made through it and fails the
/// first call to the chosen operation.
#[derive(Debug)]
pub struct FailingStore<S> {
    inner: S,
    fail_on: &'static str,
    calls: Vec<&'static str>,
}

impl<S: Store> FailingStore<S> {
    /// `fail_on` is a store method name such as `"save_tasks"`.
    pub fn new(inner: S, fail_on: &'static str) -> Self {
        Self {
            inner,
            fail_on,
            calls: Vec::new(),
        }
    }

    /// Operations attempted so far, the failing one included.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn enter(&mut self, operation: &'static str) -> Result<(), StoreFailure<S::Error>> {
        self.calls.push(operation);
        if operation == self.fail_on {
            return Err(StoreFailure::Injected(operation));
        }
        Ok(())
    }
}

impl<S: Store> Store for FailingStore<S> {
    type Error = StoreFailure<S::Error>;
}

impl<S: ProblemCatalog> ProblemCatalog for FailingStore<S> {
    async fn find_problems(
        &mut self,
        difficulty: Difficulty,
        topic_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Problem>, Self::Error> {
        self.enter("find_problems")?;
        self.inner
            .find_problems(difficulty, topic_ids)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn find_problem(&mut self, problem_id: Uuid) -> Result<Option<Problem>, Self::Error> {
        self.enter("find_problem")?;
        self.inner
            .find_problem(problem_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn find_topics_by_name(&mut self, names: &[String]) -> Result<Vec<Topic>, Self::Error> {
        self.enter("find_topics_by_name")?;
        self.inner
            .find_topics_by_name(names)
            .await
            .map_err(StoreFailure::Inner)
    }
}

impl<S: ProgressStore> ProgressStore for FailingStore<S> {
    async fn find_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> Result<Option<Progress>, Self::Error> {
        self.enter("find_progress")?;
        self.inner
            .find_progress(user_id, problem_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn create_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> Result<Progress, Self::Error> {
        self.enter("create_progress")?;
        self.inner
            .create_progress(user_id, problem_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn update_progress(&mut self, progress: &Progress) -> Result<Progress, Self::Error> {
        self.enter("update_progress")?;
        self.inner
            .update_progress(progress)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn find_review(&mut self, progress_id: Uuid) -> Result<Option<ReviewRecord>, Self::Error> {
        self.enter("find_review")?;
        self.inner
            .find_review(progress_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn save_review(&mut self, review: &ReviewUpsert) -> Result<ReviewRecord, Self::Error> {
        self.enter("save_review")?;
        self.inner
            .save_review(review)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn delete_review(&mut self, progress_id: Uuid) -> Result<bool, Self::Error> {
        self.enter("delete_review")?;
        self.inner
            .delete_review(progress_id)
            .await
            .map_err(StoreFailure::Inner)
    }
}

impl<S: PlanStore> PlanStore for FailingStore<S> {
    async fn lock_plan_owner(&mut self, user_id: Uuid) -> Result<(), Self::Error> {
        self.enter("lock_plan_owner")?;
        self.inner
            .lock_plan_owner(user_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn find_active_plan(&mut self, user_id: Uuid) -> Result<Option<StudyPlan>, Self::Error> {
        self.enter("find_active_plan")?;
        self.inner
            .find_active_plan(user_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn delete_plan(&mut self, plan_id: Uuid) -> Result<(), Self::Error> {
        self.enter("delete_plan")?;
        self.inner
            .delete_plan(plan_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn create_plan(&mut self, plan: &NewStudyPlan) -> Result<StudyPlan, Self::Error> {
        self.enter("create_plan")?;
        self.inner
            .create_plan(plan)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn set_active_plan(&mut self, user_id: Uuid, plan_id: Uuid) -> Result<(), Self::Error> {
        self.enter("set_active_plan")?;
        self.inner
            .set_active_plan(user_id, plan_id)
            .await
            .map_err(StoreFailure::Inner)
    }

    async fn save_tasks(
        &mut self,
        plan_id: Uuid,
        tasks: &[NewDailyTask],
    ) -> Result<Vec<DailyTask>, Self::Error> {
        self.enter("save_tasks")?;
        self.inner
            .save_tasks(plan_id, tasks)
            .await
            .map_err(StoreFailure::Inner)
    }
}
