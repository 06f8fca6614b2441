//! Public activity timeline derived from a reader's event stream.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::entity::{Entity, EventRecord};

use super::action::RateInput;
use super::book_id::BookId;
use super::error::LibraryError;
use super::reader::{
    Reader, COVER_CHANGED, LIKE_TOGGLED, RATED, READ_LIST_TOGGLED, READ_TOGGLED, REGISTERED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    Joined,
    Read,
    Unread,
    Liked,
    Unliked,
    Listed,
    Unlisted,
    Rated,
    Unrated,
    Cover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub kind: ActivityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub at: DateTime<Utc>,
}

fn book_of(event: &EventRecord) -> Result<BookId, LibraryError> {
    let (book,): (BookId,) = event.decode()?;
    Ok(book)
}

/// Classify one event against the state right before it is applied.
fn classify(before: &Reader, event: &EventRecord) -> Result<Option<Activity>, LibraryError> {
    let entry = |kind, book_id, rating| Activity {
        kind,
        book_id,
        rating,
        at: event.recorded_at,
    };

    let activity = match event.event_name.as_str() {
        REGISTERED => Some(entry(ActivityKind::Joined, None, None)),
        READ_TOGGLED => {
            let book = book_of(event)?;
            let kind = if before.read_books().contains(&book) {
                ActivityKind::Unread
            } else {
                ActivityKind::Read
            };
            Some(entry(kind, Some(book), None))
        }
        LIKE_TOGGLED => {
            let book = book_of(event)?;
            let kind = if before.liked_books().contains(&book) {
                ActivityKind::Unliked
            } else {
                ActivityKind::Liked
            };
            Some(entry(kind, Some(book), None))
        }
        READ_LIST_TOGGLED => {
            let book = book_of(event)?;
            let kind = if before.read_list().contains(&book) {
                ActivityKind::Unlisted
            } else {
                ActivityKind::Listed
            };
            Some(entry(kind, Some(book), None))
        }
        RATED => {
            let (book, input, _): (BookId, RateInput, i64) = event.decode()?;
            if input.rating == 0 {
                Some(entry(ActivityKind::Unrated, Some(book), None))
            } else {
                Some(entry(ActivityKind::Rated, Some(book), Some(input.rating)))
            }
        }
        COVER_CHANGED => {
            let (book, _): (BookId, Option<String>) = event.decode()?;
            Some(entry(ActivityKind::Cover, Some(book), None))
        }
        _ => None,
    };
    Ok(activity)
}

/// Replay `entity` event by event and return what happened, newest first.
///
/// A deleted account has no public history.
pub fn activity_feed(entity: &Entity) -> Result<Vec<Activity>, LibraryError> {
    let mut scratch = Reader::default();
    scratch.entity_mut().set_replaying(true);

    let mut feed = Vec::new();
    for event in entity.events() {
        if let Some(activity) = classify(&scratch, event)? {
            feed.push(activity);
        }
        scratch.replay_event(event)?;
    }

    if scratch.is_deleted() {
        return Ok(Vec::new());
    }
    feed.reverse();
    Ok(feed)
}
