//! Error types raised by repository implementations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("room repository lock was poisoned")]
    LockPoisoned,

    #[error("room {0} not found")]
    NotFound(String),

    #[error("invalid room id {0:?}")]
    InvalidId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
