//! Content store errors

use thiserror::Error;

/// Failure to read from the content store
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content store is not configured: {0}")]
    Misconfigured(String),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    #[error("Content store returned HTTP {0}")]
    Status(u16),

    #[error("Malformed content store response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContentError::Malformed(err.to_string())
        } else {
            ContentError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Malformed(err.to_string())
    }
}
