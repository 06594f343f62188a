//! Errors surfaced by engine operations other than command submission.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::phase::TransitionError;
use crate::state::StateError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("a batch pass is already running")]
    BatchInProgress,
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Transition(err) => err.severity(),
            EngineError::Oracle(err) => err.severity(),
            EngineError::State(err) => err.severity(),
            EngineError::BatchInProgress => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::Transition(err) => err.error_code(),
            EngineError::Oracle(err) => err.error_code(),
            EngineError::State(err) => err.error_code(),
            EngineError::BatchInProgress => "ENGINE_BATCH_IN_PROGRESS",
        }
    }
}
