//! The book-interaction domain: readers, their shelves and per-book records.

mod action;
mod activity;
mod book_id;
mod error;
mod profile;
mod reader;
mod record;
mod shelf;
mod view;

pub use action::{BookAction, CoverInput, RateInput, MAX_RATING};
pub use activity::{activity_feed, Activity, ActivityKind};
pub use book_id::BookId;
pub use error::LibraryError;
pub use profile::{Profile, ProfileUpdate, MAX_FAVORITE_BOOKS};
pub use reader::Reader;
pub use record::InteractionRecord;
pub use shelf::Shelf;
pub use view::{
    sort_newest_first, BookReview, BookState, FeedEntry, LibraryView, OwnProfile,
    ProfileStats, ProfileSummary, PublicBooks, PublicProfile, PublicReadList, PublicReviews,
    RatingBadge, UserReview,
};
