//! Provider error types

use pingdom_api::{ApiError, OccurrenceQuery};
use thiserror::Error;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Rejected locally before any remote call
    #[error("{0}")]
    Validation(String),

    #[error("invalid timestamp for `{attribute}` ({value:?}): {source}")]
    InvalidTimestamp {
        attribute: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("timestamp {epoch} is outside the supported date range")]
    TimestampOutOfRange { epoch: i64 },

    #[error("there are no occurrences matching query: {query}")]
    NoOccurrences { query: OccurrenceQuery },

    #[error(
        "occurrence tasks ended early: {reported} of {expected} reported a result"
    )]
    TaskAborted { reported: usize, expected: usize },

    #[error(
        "{attribute} cannot be changed in place ({old} -> {new}); the resource must be replaced"
    )]
    RequiresReplacement {
        attribute: &'static str,
        old: String,
        new: String,
    },

    #[error("State file error: {0}")]
    State(String),

    #[error("Lock acquisition failed: {0}")]
    Lock(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
