use serde::{Deserialize, Serialize};

use super::error::LibraryError;

pub const MAX_RATING: u8 = 10;

/// The closed set of per-book actions, tagged by the `action` field:
///
/// ```json
/// { "action": "rate", "rating": 8, "review": "loved it" }
/// ```
///
/// Unknown tags fail to decode instead of silently doing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BookAction {
    Read,
    Like,
    ReadList,
    Rate(RateInput),
    Cover(CoverInput),
}

impl BookAction {
    pub fn name(&self) -> &'static str {
        match self {
            BookAction::Read => "read",
            BookAction::Like => "like",
            BookAction::ReadList => "readList",
            BookAction::Rate(_) => "rate",
            BookAction::Cover(_) => "cover",
        }
    }

    pub fn validate(&self) -> Result<(), LibraryError> {
        match self {
            BookAction::Rate(input) if input.rating > MAX_RATING => {
                Err(LibraryError::RatingOutOfRange(input.rating))
            }
            _ => Ok(()),
        }
    }
}

/// Payload of the `rate` action. Also the payload of the `Rated` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInput {
    pub rating: u8,
    pub review: Option<String>,
    pub liked: Option<bool>,
    pub is_first_time: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverInput {
    pub cover_url: Option<String>,
}

impl CoverInput {
    /// The cover URL with blank values treated as "clear the custom cover".
    pub fn normalized(&self) -> Option<String> {
        self.cover_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}
