use serde::{Deserialize, Serialize};

use super::book_id::BookId;

/// At most this many favourite books are kept on a profile.
pub const MAX_FAVORITE_BOOKS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub pronouns: Option<String>,
    pub favorite_books: Vec<BookId>,
}

/// Partial profile update; `None` leaves a field untouched.
///
/// Also the payload of the `ProfileUpdated` event, stored after
/// [`ProfileUpdate::normalized`] so replay needs no further cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub pronouns: Option<String>,
    pub favorite_books: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Derive `full_name` from first/last name when it was not given, and
    /// clean the favourite list (non-blank ids, at most four).
    pub fn normalized(mut self) -> Self {
        if self.full_name.is_none() && (self.first_name.is_some() || self.last_name.is_some()) {
            let joined = [&self.first_name, &self.last_name]
                .into_iter()
                .flatten()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            self.full_name = Some(joined);
        }

        if let Some(favorites) = self.favorite_books.take() {
            self.favorite_books = Some(
                favorites
                    .into_iter()
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .take(MAX_FAVORITE_BOOKS)
                    .collect(),
            );
        }
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Profile {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Profile {
            username: username.into(),
            email: email.into(),
            ..Profile::default()
        }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(username) = &update.username {
            self.username = username.trim().to_string();
        }
        if let Some(email) = &update.email {
            self.email = email.trim().to_string();
        }

        let optional = [
            (&update.first_name, &mut self.first_name),
            (&update.last_name, &mut self.last_name),
            (&update.full_name, &mut self.full_name),
            (&update.avatar_url, &mut self.avatar_url),
            (&update.banner_url, &mut self.banner_url),
            (&update.location, &mut self.location),
            (&update.bio, &mut self.bio),
            (&update.pronouns, &mut self.pronouns),
        ];
        for (incoming, field) in optional {
            if let Some(value) = incoming {
                *field = non_blank(value);
            }
        }

        if let Some(favorites) = &update.favorite_books {
            self.favorite_books = favorites.iter().map(|id| BookId::new(id.as_str())).collect();
        }
    }

    /// A profile handle is the username, the email, or the part of the
    /// email before the `@`.
    pub fn matches_handle(&self, handle: &str) -> bool {
        if handle.is_empty() {
            return false;
        }
        self.username == handle
            || self.email == handle
            || self
                .email
                .strip_prefix(handle)
                .is_some_and(|rest| rest.starts_with('@'))
    }
}
