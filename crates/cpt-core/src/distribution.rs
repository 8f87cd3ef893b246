//! Target difficulty mix per skill level.

use crate::models::{Difficulty, SkillLevel};

/// Share of a plan's pool reserved for each difficulty, in whole percent.
///
/// Percentages keep quota math exact: `floor(pool * pct / 100)` never suffers
/// from binary floating point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyDistribution {
    /// Percent of the pool that should be Easy.
    pub easy_pct: u32,
    /// Percent of the pool that should be Medium.
    pub medium_pct: u32,
    /// Percent of the pool that should be Hard.
    pub hard_pct: u32,
}

/// Indexed by [`SkillLevel`] declaration order.
const DISTRIBUTIONS: [DifficultyDistribution; 3] = [
    // Beginner
    DifficultyDistribution {
        easy_pct: 60,
        medium_pct: 30,
        hard_pct: 10,
    },
    // Intermediate
    DifficultyDistribution {
        easy_pct: 25,
        medium_pct: 50,
        hard_pct: 25,
    },
    // Pro
    DifficultyDistribution {
        easy_pct: 10,
        medium_pct: 30,
        hard_pct: 60,
    },
];

impl DifficultyDistribution {
    /// The fixed mix for a skill level.
    pub const fn for_level(level: SkillLevel) -> Self {
        DISTRIBUTIONS[level as usize]
    }

    /// Whole-percent share for one difficulty.
    pub const fn percent(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_pct,
            Difficulty::Medium => self.medium_pct,
            Difficulty::Hard => self.hard_pct,
        }
    }

    /// Fraction of the pool in `[0, 1]`.
    pub fn fraction(&self, difficulty: Difficulty) -> f64 {
        f64::from(self.percent(difficulty)) / 100.0
    }

    /// How many problems of `difficulty` a pool of `pool_size` aims for:
    /// `floor(pool_size * fraction)`.
    pub const fn quota(&self, difficulty: Difficulty, pool_size: usize) -> usize {
        pool_size * self.percent(difficulty) as usize / 100
    }
}
