//! Request-scoped variables forwarded by the upstream proxy.

use std::collections::HashMap;

/// Header carrying the authenticated numeric user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Lowercased request headers of the incoming call.
///
/// Authentication happens upstream; by the time a request reaches the
/// service the caller is identified by `x-user-id`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session for a known user. Mostly useful for direct dispatch.
    pub fn for_user(user_id: u64) -> Self {
        let mut session = Self::new();
        session.set(USER_ID_HEADER, user_id.to_string());
        session
    }

    /// Raw `x-user-id` value, unparsed.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_HEADER)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }
}
