use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Error when encoding or decoding an event payload.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("payload error: {message}")]
pub struct PayloadError {
    pub message: String,
}

impl PayloadError {
    fn new(err: impl ToString) -> Self {
        PayloadError {
            message: err.to_string(),
        }
    }
}

/// One recorded fact in a stream. Payloads are bitcode-encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub event_name: String,
    pub payload: Vec<u8>,
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(event_name: impl Into<String>, payload: Vec<u8>, sequence: u64) -> Self {
        EventRecord {
            event_name: event_name.into(),
            payload,
            sequence,
            recorded_at: Utc::now(),
        }
    }

    /// Rebuild a record read back from storage.
    pub fn restore(
        event_name: impl Into<String>,
        payload: Vec<u8>,
        sequence: u64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        EventRecord {
            event_name: event_name.into(),
            payload,
            sequence,
            recorded_at,
        }
    }

    /// Encode a payload into its stored form.
    pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, PayloadError> {
        bitcode::serialize(payload).map_err(PayloadError::new)
    }

    /// Deserialize the payload into the specified type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        bitcode::deserialize(&self.payload).map_err(PayloadError::new)
    }
}
