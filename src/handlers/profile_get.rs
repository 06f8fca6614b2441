//! Handler: profile.get

use serde_json::Value;

use crate::repository::Repository;
use crate::service::{Context, HandlerError};

use super::load_reader;

pub const COMMAND: &str = "profile.get";

pub fn guard<R>(_ctx: &Context<R>) -> bool {
    true
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let reader = load_reader(ctx.repo(), ctx.user_id()?)?;
    Ok(serde_json::to_value(reader.own_profile())?)
}
