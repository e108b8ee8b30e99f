//! Error types for the aggregation core.
//!
//! Store failures are kept separate from query failures so a caller can tell
//! "nothing recorded" (an empty, successful result) from "couldn't fetch".

use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an [`EntryStore`](crate::store::EntryStore) or
/// [`RatingStore`](crate::store::RatingStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The source could not be reached or read.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source refused access.
    #[error("source unauthorized: {0}")]
    Unauthorized(String),

    /// A record was read but did not decode into a valid value.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A raw record failed typed validation at the store boundary.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed data in {path}: {error}")]
    Malformed {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[error("entry '{id}' is marked both daily and follow-up")]
    ConflictingKind { id: String },

    #[error("entry has an empty id")]
    MissingId,

    #[error("rating {value} for {day} is outside 0..=10")]
    RatingOutOfRange { day: String, value: f64 },

    #[error("invalid day key '{0}', expected YYYY-MM-DD")]
    InvalidDay(String),
}

/// All errors the aggregation API can return.
#[derive(Debug, Error)]
pub enum LoopError {
    /// Fetching entries or ratings failed. Never converted into an empty result.
    #[error(transparent)]
    SourceUnavailable(#[from] StoreError),

    /// A window whose end lies before its start.
    #[error("invalid window: end {end} is before start {start}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LoopError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn store_error_keeps_its_message_through_loop_error() {
        let err: LoopError = StoreError::Unavailable("offline".to_string()).into();
        assert_eq!(err.to_string(), "source unavailable: offline");
        assert!(matches!(err, LoopError::SourceUnavailable(_)));
    }

    #[test]
    fn invalid_window_names_both_ends() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let err = LoopError::InvalidWindow {
            start: day.and_hms_opt(12, 0, 0).unwrap(),
            end: day.and_hms_opt(8, 0, 0).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2025-03-02 08:00:00"));
        assert!(msg.contains("2025-03-02 12:00:00"));
    }

    #[test]
    fn decode_error_is_a_store_error() {
        let err: StoreError = DecodeError::MissingId.into();
        assert_eq!(err.to_string(), "entry has an empty id");
    }
}
