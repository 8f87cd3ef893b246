use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the plan and review engine.
///
/// `E` is the error type of the store the engine runs against; store failures
/// propagate unchanged so the caller can roll back its unit of work.
#[derive(Error, Debug)]
pub enum EngineError<E> {
    /// The problem was never assigned to this user
    #[error("progress not found for problem {problem_id}")]
    ProgressNotFound { problem_id: Uuid },
    #[error("problem {problem_id} not found")]
    ProblemNotFound { problem_id: Uuid },
    /// Plan length outside the accepted range
    #[error("plan duration of {days} days is out of range")]
    InvalidDuration { days: i64 },
    #[error(transparent)]
    Store(#[from] E),
}

impl<E> EngineError<E> {
    /// Whether this is one of the not-found conditions rather than a store failure.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProgressNotFound { .. } | Self::ProblemNotFound { .. }
        )
    }
}
