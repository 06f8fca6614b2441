use thiserror::Error;

use crate::entity::PayloadError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("rating {0} is outside 0..=10")]
    RatingOutOfRange(u8),

    #[error("invalid timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("account {0} has been deleted")]
    Deleted(u64),

    #[error("unknown event {0}")]
    UnknownEvent(String),
}
