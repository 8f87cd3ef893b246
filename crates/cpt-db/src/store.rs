//! Postgres implementation of the engine's store traits.

use cpt_core::{
    models::{
        DailyTask, Difficulty, NewDailyTask, NewStudyPlan, Problem, Progress, ReviewRecord,
        ReviewUpsert, StudyPlan, Topic,
    },
    store::{PlanStore, ProblemCatalog, ProgressStore, Store},
};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::repositories::{plan, problem, progress, review, topic};

/// Engine store bound to one connection, normally a transaction's.
///
/// ```ignore
/// let mut tx = pool.begin().await?;
/// let days = cpt_core::create_plan(&mut PgStore::new(&mut tx), user_id, &request, today).await?;
/// tx.commit().await?;
/// ```
#[derive(Debug)]
pub struct PgStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgStore<'c> {
    /// Store over `conn`, usually an open transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

impl Store for PgStore<'_> {
    type Error = sqlx::Error;
}

impl ProblemCatalog for PgStore<'_> {
    async fn find_problems(
        &mut self,
        difficulty: Difficulty,
        topic_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Problem>, sqlx::Error> {
        problem::find_by_difficulty(&mut *self.conn, difficulty.as_str(), topic_ids)
            .await?
            .into_iter()
            .map(Problem::try_from)
            .collect()
    }

    async fn find_problem(&mut self, problem_id: Uuid) -> Result<Option<Problem>, sqlx::Error> {
        problem::find_by_id(&mut *self.conn, problem_id)
            .await?
            .map(Problem::try_from)
            .transpose()
    }

    async fn find_topics_by_name(&mut self, names: &[String]) -> Result<Vec<Topic>, sqlx::Error> {
        let rows = topic::find_by_names(&mut *self.conn, names).await?;
        Ok(rows.into_iter().map(Topic::from).collect())
    }
}

impl ProgressStore for PgStore<'_> {
    async fn find_progress(
        &mut self,
        user_id: Uuid,
        problem_id: Uuid,
    ) -> Result<Option<Progress>, sqlx::Error> {
        progress::find(&mut *self.conn, user_id, problem_id)
            .await?
            .map(Progress::try_from)
            .transpose()
    }

    async fn create_progress(&mut self, user_id: Uuid, problem_id: Uuid) -> Result<Progress, sqlx::Error> {
        progress::create(&mut *self.conn, user_id, problem_id)
            .await?
            .try_into()
    }

    async fn update_progress(&mut self, record: &Progress) -> Result<Progress, sqlx::Error> {
        progress::update(
            &mut *self.conn,
            record.id,
            record.status.as_str(),
            record.notes.as_deref(),
        )
        .await?
        .try_into()
    }

    async fn find_review(&mut self, progress_id: Uuid) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let row = review::find_by_progress(&mut *self.conn, progress_id).await?;
        Ok(row.map(ReviewRecord::from))
    }

    async fn save_review(&mut self, upsert: &ReviewUpsert) -> Result<ReviewRecord, sqlx::Error> {
        let row = review::upsert(
            &mut *self.conn,
            upsert.progress_id,
            upsert.last_reviewed_at,
            upsert.next_review_date,
            upsert.repetition_count,
        )
        .await?;
        Ok(row.into())
    }

    async fn delete_review(&mut self, progress_id: Uuid) -> Result<bool, sqlx::Error> {
        review::delete_by_progress(&mut *self.conn, progress_id).await
    }
}

impl PlanStore for PgStore<'_> {
    async fn lock_plan_owner(&mut self, user_id: Uuid) -> Result<(), sqlx::Error> {
        plan::lock_owner(&mut *self.conn, user_id).await
    }

    async fn find_active_plan(&mut self, user_id: Uuid) -> Result<Option<StudyPlan>, sqlx::Error> {
        plan::find_active(&mut *self.conn, user_id)
            .await?
            .map(StudyPlan::try_from)
            .transpose()
    }

    async fn delete_plan(&mut self, plan_id: Uuid) -> Result<(), sqlx::Error> {
        plan::delete(&mut *self.conn, plan_id).await
    }

    async fn create_plan(&mut self, new_plan: &NewStudyPlan) -> Result<StudyPlan, sqlx::Error> {
        let mut row = plan::create(
            &mut *self.conn,
            new_plan.user_id,
            new_plan.skill_level.as_str(),
            new_plan.duration_days,
        )
        .await?;

        if !new_plan.topic_ids.is_empty() {
            plan::link_topics(&mut *self.conn, row.id, &new_plan.topic_ids).await?;
            row.topic_ids.clone_from(&new_plan.topic_ids);
        }

        row.try_into()
    }

    async fn set_active_plan(&mut self, user_id: Uuid, plan_id: Uuid) -> Result<(), sqlx::Error> {
        plan::set_active(&mut *self.conn, user_id, plan_id).await
    }

    async fn save_tasks(
        &mut self,
        plan_id: Uuid,
        tasks: &[NewDailyTask],
    ) -> Result<Vec<DailyTask>, sqlx::Error> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let (problem_ids, day_numbers): (Vec<Uuid>, Vec<i32>) =
            tasks.iter().map(|t| (t.problem_id, t.day_number)).unzip();

        let rows = plan::insert_tasks(&mut *self.conn, plan_id, &problem_ids, &day_numbers).await?;
        Ok(rows.into_iter().map(DailyTask::from).collect())
    }
}
