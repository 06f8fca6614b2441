//! Handler: friends.books
//!
//! What other readers have been reading. Looks at the most recently joined
//! `feed_limit` readers and lists their read shelves in shelf order.

use std::cmp::Reverse;

use serde_json::{json, Value};

use crate::library::FeedEntry;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::live_readers;

pub const COMMAND: &str = "friends.books";

pub fn guard<R>(_ctx: &Context<R>) -> bool {
    true
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let caller = ctx.optional_user_id();
    let mut readers = live_readers(ctx.repo())?;
    readers.retain(|r| Some(r.user_id()) != caller);
    readers.sort_by_key(|r| Reverse((r.joined_at(), r.user_id())));

    let books: Vec<FeedEntry> = readers
        .iter()
        .take(ctx.settings().feed_limit)
        .flat_map(|r| r.feed_entries())
        .collect();
    Ok(json!({ "books": books }))
}
