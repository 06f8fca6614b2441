//! Handler: book.state

use serde_json::Value;

use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{load_reader, BookTarget};

pub const COMMAND: &str = "book.state";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.optional_user_id().is_none() || ctx.has_text("bookId")
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let BookTarget { book_id } = ctx.input()?;
    let reader = load_reader(ctx.repo(), user_id)?;
    Ok(serde_json::to_value(reader.book_state(&book_id))?)
}
