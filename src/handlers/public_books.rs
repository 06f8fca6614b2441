//! Handler: public.books

use serde_json::Value;

use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{find_by_handle, HandleTarget};

pub const COMMAND: &str = "public.books";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("handle")
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let HandleTarget { handle } = ctx.input()?;
    let reader = find_by_handle(ctx.repo(), &handle)?;
    Ok(serde_json::to_value(reader.public_books())?)
}
