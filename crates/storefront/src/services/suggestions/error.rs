//! Error types for category suggestions.

use thiserror::Error;

/// Errors that can occur while suggesting categories.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// The submitted image or description is unusable.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API key could not be used as a header value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// The model reply did not contain a category list.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SuggestionError {
    /// Whether the caller sent bad input, as opposed to an upstream failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// API error response body.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
