//! Error type for command handlers.

use thiserror::Error;

use crate::library::LibraryError;
use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Input could not be deserialized.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// The command's guard refused the input.
    #[error("guard rejected command: {0}")]
    GuardRejected(String),
    /// Business rule rejected the command.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Another write won the race, or a unique value is taken.
    #[error("{0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("handler error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RepositoryError> for HandlerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConcurrentWrite { .. } => HandlerError::Conflict(err.to_string()),
            other => HandlerError::Repository(other),
        }
    }
}

impl From<LibraryError> for HandlerError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Deleted(id) => HandlerError::NotFound(format!("user {id}")),
            LibraryError::RatingOutOfRange(_) => HandlerError::Rejected(err.to_string()),
            other => HandlerError::Other(Box::new(other)),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Rejected(_) => 422,
            HandlerError::NotFound(_) => 404,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Conflict(_) => 409,
            HandlerError::Repository(_) => 500,
            HandlerError::Other(_) => 500,
        }
    }
}
