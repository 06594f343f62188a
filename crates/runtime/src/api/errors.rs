//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the engine, and checkpoint
//! persistence so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{EngineError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("match worker command channel closed")]
    CommandChannelClosed,

    #[error("match worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("match worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to encode match state")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode match state")]
    Decode(#[source] bincode::Error),

    #[error("checkpoint digest mismatch: expected {expected}, computed {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("failed to serialize command log")]
    Serialize(#[from] serde_json::Error),

    #[error("i/o failure at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Engine(err) => err.severity(),
            RuntimeError::DigestMismatch { .. } | RuntimeError::Decode(_) => ErrorSeverity::Fatal,
            RuntimeError::Io { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::MissingOracles => "RUNTIME_MISSING_ORACLES",
            RuntimeError::Engine(err) => err.error_code(),
            RuntimeError::Encode(_) => "RUNTIME_ENCODE",
            RuntimeError::Decode(_) => "RUNTIME_DECODE",
            RuntimeError::DigestMismatch { .. } => "RUNTIME_DIGEST_MISMATCH",
            RuntimeError::Serialize(_) => "RUNTIME_SERIALIZE",
            RuntimeError::Io { .. } => "RUNTIME_IO",
        }
    }
}
