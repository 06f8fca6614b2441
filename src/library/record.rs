use chrono::{DateTime, Utc};
use serde::Serialize;

use super::action::RateInput;

/// Rating, review, flags and custom cover for one (user, book) pair.
///
/// `rating` is 0..=10 (half stars on a five star scale); 0 means unrated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub rating: u8,
    pub review: String,
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
}

impl InteractionRecord {
    /// Overlay a rate payload. Omitted fields keep their previous values.
    pub fn merge(&mut self, input: &RateInput, rated_at: DateTime<Utc>) {
        self.rating = input.rating;
        if let Some(review) = &input.review {
            self.review = review.clone();
        }
        if let Some(liked) = input.liked {
            self.liked = liked;
        }
        if input.is_first_time.is_some() {
            self.is_first_time = input.is_first_time;
        }
        self.rated_at = Some(rated_at);
    }

    pub fn has_review(&self) -> bool {
        !self.review.trim().is_empty()
    }
}
