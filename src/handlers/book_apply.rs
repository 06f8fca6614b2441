//! Handler: book.apply
//!
//! Applies one `read | like | readList | rate | cover` action to the
//! caller's state for a book and returns their updated shelves.

use chrono::Utc;
use serde_json::Value;

use crate::aggregate::CommitAggregate;
use crate::library::BookAction;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{load_reader, BookTarget};

pub const COMMAND: &str = "book.apply";

/// Anonymous callers pass through so `handle` answers 401 before any
/// payload check.
pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.optional_user_id().is_none() || (ctx.has_text("bookId") && ctx.has_text("action"))
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let BookTarget { book_id } = ctx.input()?;
    let action = ctx.input::<BookAction>()?;

    let mut reader = load_reader(ctx.repo(), user_id)?;
    reader.apply(&book_id, &action, Utc::now())?;
    ctx.repo().commit_aggregate(&mut reader)?;

    tracing::debug!(user_id, book = %book_id, action = action.name(), "applied book action");
    Ok(serde_json::to_value(reader.library_view())?)
}
