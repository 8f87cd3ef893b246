//! Planning engine of the practice tracker: difficulty-weighted pool
//! selection, day allocation, plan replacement and the review schedule that
//! follows completion toggles.
//!
//! The engine is storage-agnostic. It talks to persistence through the traits
//! in [`store`], and the caller owns the surrounding transaction.

pub mod allocator;
pub mod distribution;
pub mod error;
pub mod models;
pub mod normalization;
pub mod plan;
pub mod pool;
pub mod progress;
pub mod review;
pub mod stats;
pub mod store;
pub mod summary;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::EngineError;
pub use plan::{PlanRequest, create_plan};
pub use review::ReviewScheduler;
pub use stats::DashboardStats;
pub use summary::{DailyPlan, ProblemSummary};
