//! Handler: book.reviews
//!
//! Everyone's written review of one book, newest first. Open to anonymous
//! callers.

use serde_json::{json, Value};

use crate::library::{sort_newest_first, BookReview};
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{live_readers, BookTarget};

pub const COMMAND: &str = "book.reviews";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("bookId")
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let BookTarget { book_id } = ctx.input()?;
    let mut reviews: Vec<BookReview> = live_readers(ctx.repo())?
        .iter()
        .filter_map(|reader| reader.review_of(&book_id))
        .collect();
    sort_newest_first(&mut reviews);
    Ok(json!({ "bookId": book_id, "reviews": reviews }))
}
