//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables, service settings and a
//! reference to the repository.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;
use super::Settings;

pub struct Context<'a, R> {
    input: Value,
    session: Session,
    repo: &'a R,
    settings: &'a Settings,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(input: Value, session: Session, repo: &'a R, settings: &'a Settings) -> Self {
        Self {
            input,
            session,
            repo,
            settings,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    /// The authenticated caller. `Unauthorized` when the header is missing
    /// or not a number.
    pub fn user_id(&self) -> Result<u64, HandlerError> {
        let raw = self
            .session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing user id".into()))?;
        raw.trim()
            .parse()
            .map_err(|_| HandlerError::Unauthorized(format!("invalid user id {raw:?}")))
    }

    /// Like [`Context::user_id`], but anonymous callers are `None`.
    pub fn optional_user_id(&self) -> Option<u64> {
        self.user_id().ok()
    }

    pub fn repo(&self) -> &R {
        self.repo
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Whether the input has a non-empty string field.
    pub fn has_text(&self, field: &str) -> bool {
        self.input
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    }
}
