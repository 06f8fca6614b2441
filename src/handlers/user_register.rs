//! Handler: user.register
//!
//! Creates a reader with the next free numeric id. Ids of deleted accounts
//! are never handed out again.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::aggregate::{CommitAggregate, FindAggregate};
use crate::library::Reader;
use crate::repository::Repository;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "user.register";

#[derive(Debug, Deserialize)]
struct RegisterInput {
    username: String,
    email: String,
}

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("username") && ctx.has_text("email")
}

pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
    let input = ctx.input::<RegisterInput>()?;
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();

    let everyone: Vec<Reader> = ctx.repo().find_aggregate(|_: &Reader| true)?;
    let live = || everyone.iter().filter(|r| !r.is_deleted());
    if live().any(|r| r.profile().username == username) {
        return Err(HandlerError::Conflict("Username already exists".into()));
    }
    if live().any(|r| r.profile().email == email) {
        return Err(HandlerError::Conflict("Email already exists".into()));
    }

    let user_id = everyone.iter().map(Reader::user_id).max().unwrap_or(0) + 1;
    let mut reader = Reader::default();
    reader.register(user_id, username, email, Utc::now())?;
    ctx.repo().commit_aggregate(&mut reader)?;

    tracing::info!(user_id, username = %reader.profile().username, "registered reader");
    Ok(json!({
        "id": user_id,
        "username": reader.profile().username,
        "email": reader.profile().email,
    }))
}
