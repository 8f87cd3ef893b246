//! HTTP surface of the practice tracker.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod plan;
pub mod problem;
pub mod router;
pub mod state;
pub mod tracing;
pub mod topic;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
