//! Weighted, shuffled problem pool for a new plan.

use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

use crate::{
    distribution::DifficultyDistribution,
    models::{Difficulty, Problem, SkillLevel},
    store::ProblemCatalog,
};

/// Fixed plan density.
pub const PROBLEMS_PER_DAY: usize = 3;

/// Upper bound on a plan's pool: `3 * days`.
pub const fn target_pool_size(days: u32) -> usize {
    PROBLEMS_PER_DAY * days as usize
}

/// Catalog candidates split by difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBuckets {
    pub easy: Vec<Problem>,
    pub medium: Vec<Problem>,
    pub hard: Vec<Problem>,
}

impl CandidateBuckets {
    /// The bucket holding `difficulty`.
    pub fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Problem> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Fetch every bucket from the catalog with the same topic filter.
    pub async fn fetch<C: ProblemCatalog>(
        catalog: &mut C,
        topic_ids: Option<&[Uuid]>,
    ) -> Result<Self, C::Error> {
        let mut buckets = Self::default();
        for difficulty in Difficulty::ALL {
            *buckets.bucket_mut(difficulty) = catalog.find_problems(difficulty, topic_ids).await?;
        }
        Ok(buckets)
    }
}

/// Draw a plan pool from pre-fetched buckets.
///
/// Each bucket is shuffled and truncated to its quota
/// (`floor(3 * days * fraction)`), then the selections are concatenated and
/// shuffled again. An under-supplied bucket contributes what it has; the
/// shortfall is not made up from other difficulties.
pub fn select_pool<R: Rng + ?Sized>(
    level: SkillLevel,
    days: u32,
    mut buckets: CandidateBuckets,
    rng: &mut R,
) -> Vec<Problem> {
    let distribution = DifficultyDistribution::for_level(level);
    let target = target_pool_size(days);
    let mut pool = Vec::with_capacity(target);

    for difficulty in Difficulty::ALL {
        let quota = distribution.quota(difficulty, target);
        let bucket = buckets.bucket_mut(difficulty);
        let available = bucket.len();

        bucket.shuffle(rng);
        bucket.truncate(quota);

        tracing::debug!(
            %difficulty,
            quota,
            available,
            selected = bucket.len(),
            "selected pool bucket"
        );

        pool.append(bucket);
    }

    pool.shuffle(rng);
    pool
}

/// Fetch candidates and draw a pool with the thread-local RNG.
pub async fn build_pool<C: ProblemCatalog>(
    catalog: &mut C,
    level: SkillLevel,
    days: u32,
    topic_ids: Option<&[Uuid]>,
) -> Result<Vec<Problem>, C::Error> {
    let buckets = CandidateBuckets::fetch(catalog, topic_ids).await?;
    Ok(select_pool(level, days, buckets, &mut rand::thread_rng()))
}
