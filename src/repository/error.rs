use thiserror::Error;

use crate::entity::PayloadError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The stream moved on since the entity was loaded.
    #[error("concurrent write detected for entity {id} (expected version {expected}, got {actual})")]
    ConcurrentWrite {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("replay error: {0}")]
    Replay(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}
