//! Handler: profile.update
//!
//! Partial update of the caller's profile. Username and email stay unique
//! across live accounts.

use serde_json::Value;

use crate::aggregate::CommitAggregate;
use crate::library::ProfileUpdate;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::{live_readers, load_reader};

pub const COMMAND: &str = "profile.update";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.optional_user_id().is_none() || ctx.raw_input().is_object()
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| v.trim().is_empty())
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let update = ctx.input::<ProfileUpdate>()?;
    if blank(&update.username) || blank(&update.email) {
        return Err(HandlerError::Rejected("username and email cannot be blank".into()));
    }

    let others = live_readers(ctx.repo())?;
    let others = others.iter().filter(|r| r.user_id() != user_id);
    for other in others {
        if update.username.as_deref().map(str::trim) == Some(other.profile().username.as_str()) {
            return Err(HandlerError::Conflict("Username already exists".into()));
        }
        if update.email.as_deref().map(str::trim) == Some(other.profile().email.as_str()) {
            return Err(HandlerError::Conflict("Email already exists".into()));
        }
    }

    let mut reader = load_reader(ctx.repo(), user_id)?;
    reader.update_profile(update)?;
    ctx.repo().commit_aggregate(&mut reader)?;

    tracing::debug!(user_id, "updated profile");
    Ok(serde_json::to_value(reader.own_profile())?)
}
