//! Command handlers, one file per command.
//!
//! Every module exports `COMMAND`, `guard` and `handle`; [`service`] wires
//! them all onto a [`Service`].

use serde::Deserialize;

use crate::aggregate::{FindAggregate, GetAggregate};
use crate::library::{BookId, Reader};
use crate::repository::{Find, Get, Repository};
use crate::service::{HandlerError, Service, Settings};

pub mod book_apply;
pub mod book_reviews;
pub mod book_state;
pub mod friends_books;
pub mod profile_delete;
pub mod profile_get;
pub mod profile_update;
pub mod public_activity;
pub mod public_books;
pub mod public_profile;
pub mod public_readlist;
pub mod public_reviews;
pub mod user_register;

/// Build the service with every command registered.
pub fn service<R>(repo: R, settings: Settings) -> Service<R>
where
    R: Repository + Send + Sync + 'static,
{
    crate::register_handlers!(
        Service::with_settings(repo, settings),
        user_register,
        book_apply,
        book_state,
        book_reviews,
        profile_get,
        profile_update,
        profile_delete,
        public_profile,
        public_books,
        public_readlist,
        public_reviews,
        public_activity,
        friends_books,
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookTarget {
    pub book_id: BookId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HandleTarget {
    pub handle: String,
}

/// Load a live reader by id.
pub(crate) fn load_reader<R: Get>(repo: &R, user_id: u64) -> Result<Reader, HandlerError> {
    match repo.get_aggregate::<Reader>(&user_id.to_string())? {
        Some(reader) if !reader.is_deleted() => Ok(reader),
        _ => Err(HandlerError::NotFound(format!("user {user_id}"))),
    }
}

/// Every reader that has not deleted their account.
pub(crate) fn live_readers<R: Find>(repo: &R) -> Result<Vec<Reader>, HandlerError> {
    Ok(repo.find_aggregate(|reader: &Reader| !reader.is_deleted())?)
}

/// Resolve a public handle (username, email, or email local part).
pub(crate) fn find_by_handle<R: Find>(repo: &R, handle: &str) -> Result<Reader, HandlerError> {
    let handle = handle.trim();
    let mut readers = live_readers(repo)?;
    // Streams come back ordered as text, so "10" precedes "2".
    let index = readers
        .iter()
        .position(|r| r.profile().username == handle)
        .or_else(|| {
            readers
                .iter()
                .enumerate()
                .filter(|(_, r)| r.matches_handle(handle))
                .min_by_key(|(_, r)| r.user_id())
                .map(|(i, _)| i)
        });
    match index {
        Some(i) => Ok(readers.swap_remove(i)),
        None => Err(HandlerError::NotFound(format!("profile {handle}"))),
    }
}
