//! Unified error type surfaced by the runtime API.
//!
//! Boundary layers map these to responses with [`RuntimeError::http_status`]:
//! rule violations and unknown battles are the caller's fault (4xx), anything
//! that points at broken state or storage is ours (5xx).

use thiserror::Error;

use tactics_core::{ExecuteError, GameError, RehydrationError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle {0} not found")]
    BattleNotFound(String),

    #[error("battle {0} already exists")]
    BattleExists(String),

    #[error("battle {0} is already finished")]
    BattleFinished(String),

    #[error("battle could not be created: {0}")]
    InvalidSetup(String),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error("battle could not be restored: {0}")]
    Rehydration(#[from] RehydrationError),

    #[error("room {room} digest mismatch: stored {stored}, computed {computed}")]
    DigestMismatch {
        room: String,
        stored: String,
        computed: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RuntimeError {
    /// True when the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            RuntimeError::BattleNotFound(_)
            | RuntimeError::BattleExists(_)
            | RuntimeError::BattleFinished(_)
            | RuntimeError::InvalidSetup(_) => true,
            RuntimeError::Execute(error) => error.severity().is_client_error(),
            RuntimeError::Repository(RepositoryError::NotFound(_)) => true,
            RuntimeError::Rehydration(_)
            | RuntimeError::DigestMismatch { .. }
            | RuntimeError::Serialization(_)
            | RuntimeError::Repository(_)
            | RuntimeError::Task(_) => false,
        }
    }

    /// HTTP-equivalent status code.
    pub fn http_status(&self) -> u16 {
        match self {
            RuntimeError::BattleNotFound(_)
            | RuntimeError::Repository(RepositoryError::NotFound(_)) => 404,
            RuntimeError::BattleExists(_) | RuntimeError::BattleFinished(_) => 409,
            RuntimeError::InvalidSetup(_) => 400,
            RuntimeError::Execute(_) if self.is_client_error() => 400,
            _ => 500,
        }
    }

    /// The rule violation behind this error, if any.
    pub fn rule(&self) -> Option<&tactics_core::BattleRuleError> {
        match self {
            RuntimeError::Execute(error) => error.rule(),
            _ => None,
        }
    }
}
