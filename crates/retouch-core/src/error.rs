//! Error types for Retouch

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetouchError>;

#[derive(Error, Debug)]
pub enum RetouchError {
    #[error("Failed to read image: {0}")]
    Read(#[source] std::io::Error),

    #[error("Malformed image payload: {0}")]
    MalformedPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No image returned: {0}")]
    NoImage(String),

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetouchError {
    /// Whether the error came from the remote edit capability. These are
    /// all reported to the user with one generic message.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            RetouchError::NoImage(_) | RetouchError::Remote(_) | RetouchError::Timeout(_)
        )
    }
}

impl From<base64::DecodeError> for RetouchError {
    fn from(e: base64::DecodeError) -> Self {
        RetouchError::MalformedPayload(e.to_string())
    }
}
