//! Handler: public.activity
//!
//! Timeline rebuilt from the reader's event stream rather than stored.

use serde_json::{json, Value};

use crate::library::activity_feed;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{find_by_handle, HandleTarget};

pub const COMMAND: &str = "public.activity";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("handle")
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let HandleTarget { handle } = ctx.input()?;
    let reader = find_by_handle(ctx.repo(), &handle)?;
    let activity = activity_feed(&reader.entity)?;
    Ok(json!({ "activity": activity, "profile": reader.summary() }))
}
