use thiserror::Error;

use crate::models::{DraftError, PayloadError};

/// Errors talking to the archive API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// HTTP succeeded but the envelope status was not `success`
    #[error("API reported failure: {0}")]
    Upstream(String),

    #[error("malformed API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl ApiError {
    /// Whether the caller sent something unusable, as opposed to an upstream failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidInput(_) | ApiError::Draft(_) | ApiError::Payload(_)
        )
    }
}
