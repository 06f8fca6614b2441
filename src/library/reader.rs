//! The `Reader` aggregate: one user's profile, shelves and per-book records.
//!
//! Every command method records its event first and then mutates state; replay
//! calls the same methods with the entity in replay mode, so `digest` is a no-op
//! and only the mutation runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::aggregate::Aggregate;
use crate::entity::{Entity, EventRecord};

use super::action::{BookAction, RateInput};
use super::book_id::BookId;
use super::error::LibraryError;
use super::profile::{Profile, ProfileUpdate};
use super::record::InteractionRecord;
use super::shelf::Shelf;

pub const REGISTERED: &str = "Registered";
pub const READ_TOGGLED: &str = "ReadToggled";
pub const LIKE_TOGGLED: &str = "LikeToggled";
pub const READ_LIST_TOGGLED: &str = "ReadListToggled";
pub const RATED: &str = "Rated";
pub const COVER_CHANGED: &str = "CoverChanged";
pub const PROFILE_UPDATED: &str = "ProfileUpdated";
pub const ACCOUNT_DELETED: &str = "AccountDeleted";

#[derive(Debug, Default)]
pub struct Reader {
    pub entity: Entity,
    user_id: u64,
    profile: Profile,
    joined_at: Option<DateTime<Utc>>,
    deleted: bool,
    read_books: Shelf,
    read_list: Shelf,
    liked_books: Shelf,
    ratings: BTreeMap<BookId, InteractionRecord>,
}

pub(crate) fn from_millis(millis: i64) -> Result<DateTime<Utc>, LibraryError> {
    DateTime::from_timestamp_millis(millis).ok_or(LibraryError::InvalidTimestamp(millis))
}

impl Reader {
    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn register(
        &mut self,
        user_id: u64,
        username: String,
        email: String,
        at: DateTime<Utc>,
    ) -> Result<(), LibraryError> {
        let millis = at.timestamp_millis();
        self.entity
            .digest(REGISTERED, &(user_id, &username, &email, millis))?;

        self.entity.set_id(user_id.to_string());
        self.user_id = user_id;
        self.profile = Profile::new(username, email);
        self.joined_at = Some(from_millis(millis)?);
        Ok(())
    }

    /// Apply one per-book action.
    pub fn apply(
        &mut self,
        book: &BookId,
        action: &BookAction,
        at: DateTime<Utc>,
    ) -> Result<(), LibraryError> {
        if self.deleted {
            return Err(LibraryError::Deleted(self.user_id));
        }
        action.validate()?;

        match action {
            BookAction::Read => self.toggle_read(book),
            BookAction::Like => self.toggle_like(book),
            BookAction::ReadList => self.toggle_read_list(book),
            BookAction::Rate(input) => self.rate(book, input, at.timestamp_millis()),
            BookAction::Cover(input) => self.change_cover(book, input.normalized()),
        }
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), LibraryError> {
        if self.deleted {
            return Err(LibraryError::Deleted(self.user_id));
        }
        let update = update.normalized();
        self.entity.digest(PROFILE_UPDATED, &update)?;
        self.profile.apply(&update);
        Ok(())
    }

    /// Tombstone the account. Shelves, records and profile are dropped.
    pub fn delete(&mut self) -> Result<(), LibraryError> {
        if self.deleted {
            return Err(LibraryError::Deleted(self.user_id));
        }
        self.entity.digest(ACCOUNT_DELETED, &())?;
        self.deleted = true;
        self.profile = Profile::default();
        self.read_books.clear();
        self.read_list.clear();
        self.liked_books.clear();
        self.ratings.clear();
        Ok(())
    }

    fn toggle_read(&mut self, book: &BookId) -> Result<(), LibraryError> {
        self.entity.digest(READ_TOGGLED, &(book,))?;

        if self.read_books.remove(book) {
            self.ratings.remove(book);
        } else {
            self.mark_read(book);
        }
        Ok(())
    }

    fn toggle_like(&mut self, book: &BookId) -> Result<(), LibraryError> {
        self.entity.digest(LIKE_TOGGLED, &(book,))?;

        if self.liked_books.toggle(book) {
            self.mark_read(book);
        }
        Ok(())
    }

    fn toggle_read_list(&mut self, book: &BookId) -> Result<(), LibraryError> {
        self.entity.digest(READ_LIST_TOGGLED, &(book,))?;
        self.read_list.toggle(book);
        Ok(())
    }

    fn rate(&mut self, book: &BookId, input: &RateInput, rated_at: i64) -> Result<(), LibraryError> {
        if input.rating > super::action::MAX_RATING {
            return Err(LibraryError::RatingOutOfRange(input.rating));
        }
        self.entity.digest(RATED, &(book, input, rated_at))?;

        if input.rating == 0 {
            self.ratings.remove(book);
            self.read_books.remove(book);
            return Ok(());
        }

        let rated_at = from_millis(rated_at)?;
        self.ratings
            .entry(book.clone())
            .or_insert_with(|| InteractionRecord {
                is_first_time: Some(false),
                ..InteractionRecord::default()
            })
            .merge(input, rated_at);
        self.mark_read(book);
        Ok(())
    }

    fn change_cover(&mut self, book: &BookId, cover_url: Option<String>) -> Result<(), LibraryError> {
        self.entity.digest(COVER_CHANGED, &(book, &cover_url))?;

        let adds_cover = cover_url.is_some();
        self.ratings.entry(book.clone()).or_default().cover_url = cover_url;
        if adds_cover && !self.read_books.contains(book) {
            self.mark_read(book);
        }
        Ok(())
    }

    /// Reading a book takes it off the read list.
    fn mark_read(&mut self, book: &BookId) {
        self.read_books.insert(book);
        self.read_list.remove(book);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.joined_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn read_books(&self) -> &Shelf {
        &self.read_books
    }

    pub fn read_list(&self) -> &Shelf {
        &self.read_list
    }

    pub fn liked_books(&self) -> &Shelf {
        &self.liked_books
    }

    pub fn ratings(&self) -> &BTreeMap<BookId, InteractionRecord> {
        &self.ratings
    }

    pub fn record(&self, book: &BookId) -> Option<&InteractionRecord> {
        self.ratings.get(book)
    }

    pub fn matches_handle(&self, handle: &str) -> bool {
        !self.deleted && self.profile.matches_handle(handle)
    }
}

impl Aggregate for Reader {
    type ReplayError = LibraryError;

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn replay_event(&mut self, event: &EventRecord) -> Result<(), LibraryError> {
        match event.event_name.as_str() {
            REGISTERED => {
                let (user_id, username, email, millis): (u64, String, String, i64) =
                    event.decode()?;
                self.register(user_id, username, email, from_millis(millis)?)
            }
            READ_TOGGLED => {
                let (book,): (BookId,) = event.decode()?;
                self.toggle_read(&book)
            }
            LIKE_TOGGLED => {
                let (book,): (BookId,) = event.decode()?;
                self.toggle_like(&book)
            }
            READ_LIST_TOGGLED => {
                let (book,): (BookId,) = event.decode()?;
                self.toggle_read_list(&book)
            }
            RATED => {
                let (book, input, rated_at): (BookId, RateInput, i64) = event.decode()?;
                self.rate(&book, &input, rated_at)
            }
            COVER_CHANGED => {
                let (book, cover_url): (BookId, Option<String>) = event.decode()?;
                self.change_cover(&book, cover_url)
            }
            PROFILE_UPDATED => {
                let update: ProfileUpdate = event.decode()?;
                self.update_profile(update)
            }
            ACCOUNT_DELETED => self.delete(),
            other => Err(LibraryError::UnknownEvent(other.to_string())),
        }
    }
}
