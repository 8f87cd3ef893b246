//! Study plan replacement: pool selection, day allocation, progress seeding
//! and the day-by-day response.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    allocator,
    error::EngineError,
    models::{NewDailyTask, NewStudyPlan, Problem, Progress, SkillLevel},
    normalization::normalize_topic_name,
    pool,
    progress::ensure_progress,
    store::PlanStore,
    summary::{DailyPlan, ProblemSummary, format_plan_date, plan_day_date},
};

/// Shortest accepted plan, in days.
pub const MIN_PLAN_DAYS: u32 = 1;
/// Longest accepted plan, in days.
pub const MAX_PLAN_DAYS: u32 = 365;

/// A request for a new study plan.
///
/// `days` is kept signed so that negative input reaches range validation
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Target difficulty mix.
    #[serde(rename = "level")]
    pub skill_level: SkillLevel,
    /// Requested plan length.
    pub days: i64,
    /// Topic names; unknown names are ignored. Missing and `null` both mean
    /// no topic filter.
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

impl PlanRequest {
    /// `days` as a plan length, or `None` when outside
    /// [`MIN_PLAN_DAYS`]..=[`MAX_PLAN_DAYS`].
    pub fn duration(&self) -> Option<u32> {
        u32::try_from(self.days)
            .ok()
            .filter(|days| (MIN_PLAN_DAYS..=MAX_PLAN_DAYS).contains(days))
    }

    /// Requested topic names, empty when none were given.
    pub fn topic_names(&self) -> &[String] {
        self.topics.as_deref().unwrap_or_default()
    }
}

/// Replace the user's current plan with a freshly generated one.
///
/// Must run inside a single unit of work on `store`: if any step fails the
/// caller drops it, which also undoes the deletion of the previous plan.
/// Progress records are shared across plans and are only ever created here.
pub async fn create_plan<S: PlanStore>(
    store: &mut S,
    user_id: Uuid,
    request: &PlanRequest,
    today: NaiveDate,
) -> Result<Vec<DailyPlan>, EngineError<S::Error>> {
    let days = request
        .duration()
        .ok_or(EngineError::InvalidDuration { days: request.days })?;

    store.lock_plan_owner(user_id).await?;

    if let Some(previous) = store.find_active_plan(user_id).await? {
        tracing::debug!(%user_id, plan_id = %previous.id, "replacing previous plan");
        store.delete_plan(previous.id).await?;
    }

    let topic_ids = resolve_topics(store, request.topic_names()).await?;

    let plan = store
        .create_plan(&NewStudyPlan {
            user_id,
            skill_level: request.skill_level,
            duration_days: days as i32,
            topic_ids: topic_ids.clone(),
        })
        .await?;
    store.set_active_plan(user_id, plan.id).await?;

    let topic_filter = (!topic_ids.is_empty()).then_some(topic_ids.as_slice());
    let problems = pool::build_pool(store, request.skill_level, days, topic_filter).await?;
    let pool_size = problems.len();

    let assigned = allocator::allocate(problems, days);

    let mut progress: HashMap<Uuid, Progress> = HashMap::with_capacity(assigned.len());
    let mut new_tasks = Vec::with_capacity(assigned.len());
    let mut catalog: HashMap<Uuid, Problem> = HashMap::with_capacity(assigned.len());

    for (day, problem) in assigned {
        if !progress.contains_key(&problem.id) {
            let record = ensure_progress(store, user_id, problem.id).await?;
            progress.insert(problem.id, record);
        }

        new_tasks.push(NewDailyTask {
            problem_id: problem.id,
            day_number: day as i32,
        });
        catalog.entry(problem.id).or_insert(problem);
    }

    let tasks = store.save_tasks(plan.id, &new_tasks).await?;

    tracing::info!(
        %user_id,
        plan_id = %plan.id,
        skill_level = %request.skill_level,
        days,
        pool_size,
        target = pool::target_pool_size(days),
        "study plan created"
    );

    let mut by_day: BTreeMap<i32, Vec<ProblemSummary>> = BTreeMap::new();
    for task in &tasks {
        let Some(problem) = catalog.get(&task.problem_id) else {
            return Err(EngineError::ProblemNotFound {
                problem_id: task.problem_id,
            });
        };
        by_day
            .entry(task.day_number)
            .or_default()
            .push(ProblemSummary::new(problem, progress.get(&task.problem_id)));
    }

    Ok(by_day
        .into_iter()
        .map(|(day, problems)| DailyPlan {
            day,
            date: format_plan_date(plan_day_date(today, day)),
            problems,
        })
        .collect())
}

/// Look up requested topic names, dropping the ones that do not exist.
async fn resolve_topics<S: PlanStore>(
    store: &mut S,
    names: &[String],
) -> Result<Vec<Uuid>, S::Error> {
    let mut seen = HashSet::new();
    let wanted: Vec<String> = names
        .iter()
        .map(|name| normalize_topic_name(name))
        .filter(|name| !name.is_empty() && seen.insert(name.to_lowercase()))
        .collect();

    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let mut topics = store.find_topics_by_name(&wanted).await?;
    topics.sort_by(|a, b| a.name.cmp(&b.name));
    topics.dedup_by_key(|t| t.id);

    if topics.len() < wanted.len() {
        tracing::warn!(
            requested = wanted.len(),
            resolved = topics.len(),
            "ignoring unknown topic names"
        );
    }

    Ok(topics.into_iter().map(|t| t.id).collect())
}
