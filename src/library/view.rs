//! Read-side projections of a `Reader` returned by the handlers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::book_id::BookId;
use super::profile::Profile;
use super::reader::Reader;
use super::record::InteractionRecord;
use super::shelf::Shelf;

/// The caller's view of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookState {
    pub is_read: bool,
    pub is_liked: bool,
    pub is_in_read_list: bool,
    pub rating: u8,
    pub review: String,
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
    /// Whether an interaction record exists, not just a shelf flag.
    pub exists: bool,
}

/// Shelves and the full record map after an action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryView {
    pub success: bool,
    pub read_books: Shelf,
    pub read_list: Shelf,
    pub liked_books: Shelf,
    pub book_ratings: BTreeMap<BookId, InteractionRecord>,
}

/// The caller's own profile with everything attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    pub id: u64,
    #[serde(flatten)]
    pub profile: Profile,
    pub joined_at: Option<DateTime<Utc>>,
    pub read_books: Shelf,
    pub read_list: Shelf,
    pub liked_books: Shelf,
    pub book_ratings: BTreeMap<BookId, InteractionRecord>,
}

/// Header block attached to every public page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: u64,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub books: usize,
    pub liked: usize,
    pub read_list: usize,
    pub reviews: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub pronouns: Option<String>,
    pub favorite_books: Vec<BookId>,
    pub joined_at: Option<DateTime<Utc>>,
    pub stats: ProfileStats,
}

/// Compact rating shown on shelf pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBadge {
    pub value: u8,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBooks {
    pub read_books: Shelf,
    pub book_ratings: BTreeMap<BookId, RatingBadge>,
    pub profile: ProfileSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReadList {
    pub read_list: Shelf,
    pub book_ratings: BTreeMap<BookId, RatingBadge>,
    pub profile: ProfileSummary,
}

/// One of a user's own reviews.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReview {
    pub book_id: BookId,
    pub rating: u8,
    pub review: String,
    pub liked: bool,
    pub is_first_time: Option<bool>,
    pub rated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReviews {
    pub reviews: Vec<UserReview>,
    pub profile: ProfileSummary,
}

/// One user's review of a given book, as listed on the book page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReview {
    pub user_id: u64,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: u8,
    pub review: String,
    pub rated_at: Option<DateTime<Utc>>,
}

/// A book on somebody else's read shelf.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub book_id: BookId,
    pub user_id: u64,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: u8,
}

/// Newest `rated_at` first; undated reviews sink to the end.
pub fn sort_newest_first(reviews: &mut [BookReview]) {
    reviews.sort_by(|a, b| b.rated_at.cmp(&a.rated_at));
}

impl Reader {
    pub fn book_state(&self, book: &BookId) -> BookState {
        let record = self.record(book);
        BookState {
            is_read: self.read_books().contains(book),
            is_liked: self.liked_books().contains(book),
            is_in_read_list: self.read_list().contains(book),
            rating: record.map_or(0, |r| r.rating),
            review: record.map(|r| r.review.clone()).unwrap_or_default(),
            liked: record.is_some_and(|r| r.liked),
            is_first_time: record.and_then(|r| r.is_first_time),
            cover_url: record.and_then(|r| r.cover_url.clone()),
            rated_at: record.and_then(|r| r.rated_at),
            exists: record.is_some(),
        }
    }

    pub fn library_view(&self) -> LibraryView {
        LibraryView {
            success: true,
            read_books: self.read_books().clone(),
            read_list: self.read_list().clone(),
            liked_books: self.liked_books().clone(),
            book_ratings: self.ratings().clone(),
        }
    }

    pub fn own_profile(&self) -> OwnProfile {
        OwnProfile {
            id: self.user_id(),
            profile: self.profile().clone(),
            joined_at: self.joined_at(),
            read_books: self.read_books().clone(),
            read_list: self.read_list().clone(),
            liked_books: self.liked_books().clone(),
            book_ratings: self.ratings().clone(),
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        let profile = self.profile();
        ProfileSummary {
            id: self.user_id(),
            username: profile.username.clone(),
            full_name: profile.full_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            banner_url: profile.banner_url.clone(),
            bio: profile.bio.clone(),
        }
    }

    pub fn public_profile(&self) -> PublicProfile {
        let profile = self.profile();
        PublicProfile {
            id: self.user_id(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            banner_url: profile.banner_url.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            pronouns: profile.pronouns.clone(),
            favorite_books: profile.favorite_books.clone(),
            joined_at: self.joined_at(),
            stats: ProfileStats {
                books: self.read_books().len(),
                liked: self.liked_books().len(),
                read_list: self.read_list().len(),
                reviews: self.ratings().values().filter(|r| r.has_review()).count(),
            },
        }
    }

    fn rating_badges(&self) -> BTreeMap<BookId, RatingBadge> {
        self.ratings()
            .iter()
            .map(|(book, record)| {
                let badge = RatingBadge {
                    value: record.rating,
                    count: 1,
                    cover_url: record.cover_url.clone(),
                };
                (book.clone(), badge)
            })
            .collect()
    }

    pub fn public_books(&self) -> PublicBooks {
        PublicBooks {
            read_books: self.read_books().clone(),
            book_ratings: self.rating_badges(),
            profile: self.summary(),
        }
    }

    pub fn public_read_list(&self) -> PublicReadList {
        PublicReadList {
            read_list: self.read_list().clone(),
            book_ratings: self.rating_badges(),
            profile: self.summary(),
        }
    }

    pub fn public_reviews(&self) -> PublicReviews {
        let reviews = self
            .ratings()
            .iter()
            .filter(|(_, record)| record.has_review())
            .map(|(book, record)| UserReview {
                book_id: book.clone(),
                rating: record.rating,
                review: record.review.clone(),
                liked: record.liked,
                is_first_time: record.is_first_time,
                rated_at: record.rated_at,
            })
            .collect();
        PublicReviews {
            reviews,
            profile: self.summary(),
        }
    }

    /// This user's review of `book`, if it has non-blank text.
    pub fn review_of(&self, book: &BookId) -> Option<BookReview> {
        let record = self.record(book).filter(|r| r.has_review())?;
        let profile = self.profile();
        Some(BookReview {
            user_id: self.user_id(),
            username: profile.username.clone(),
            full_name: profile.full_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            rating: record.rating,
            review: record.review.clone(),
            rated_at: record.rated_at,
        })
    }

    /// Every book on the read shelf, in shelf order.
    pub fn feed_entries(&self) -> Vec<FeedEntry> {
        let profile = self.profile();
        self.read_books()
            .iter()
            .map(|book| FeedEntry {
                book_id: book.clone(),
                user_id: self.user_id(),
                username: profile.username.clone(),
                full_name: profile.full_name.clone(),
                avatar_url: profile.avatar_url.clone(),
                rating: self.record(book).map_or(0, |r| r.rating),
            })
            .collect()
    }
}
