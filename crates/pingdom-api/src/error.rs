//! Pingdom API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Error body returned by the Pingdom API for a non-2xx response
    #[error("{status} {description}: {message}")]
    Api {
        status: u16,
        description: String,
        message: String,
    },

    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failed response, if the error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::UnexpectedResponse { status, .. } => {
                Some(*status)
            }
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
