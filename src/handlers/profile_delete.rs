//! Handler: profile.delete

use serde_json::{json, Value};

use crate::aggregate::CommitAggregate;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::load_reader;

pub const COMMAND: &str = "profile.delete";

pub fn guard<R>(_ctx: &Context<R>) -> bool {
    true
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let mut reader = load_reader(ctx.repo(), user_id)?;
    reader.delete()?;
    ctx.repo().commit_aggregate(&mut reader)?;

    tracing::info!(user_id, "deleted account");
    Ok(json!({ "success": true }))
}
