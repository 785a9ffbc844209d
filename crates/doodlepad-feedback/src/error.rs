//! Feedback service errors.

use thiserror::Error;

/// Errors talking to the feedback service.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Feedback request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse feedback payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Feedback service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Feedback reply contained no text")]
    EmptyReply,
}

/// Result type for feedback operations.
pub type FeedbackResult<T> = Result<T, FeedbackError>;
