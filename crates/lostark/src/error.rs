//! Typed failures for Lost Ark API lookups.

use reqwest::StatusCode;

/// Errors from a character lookup against the upstream API.
///
/// `Transient` is only produced after the retry budget is exhausted;
/// `NotFound` and `Malformed` are reported immediately and never
/// consume retry attempts.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The character handle no longer exists upstream.
    #[error("Character not found")]
    NotFound,

    /// A retryable failure (429, 5xx, network timeout) that persisted
    /// through every retry attempt.
    #[error("Transient API failure after {attempts} attempts: {message}")]
    Transient {
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Detail of the final failed attempt.
        message: String,
    },

    /// An undecodable body or a non-retryable unexpected status
    /// (e.g. 400/401/403).
    #[error("Malformed API response: {0}")]
    Malformed(String),

    /// The configured base URL could not be parsed.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Retry classification of an HTTP response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx, proceed to decode the body.
    Success,
    /// 404, the handle is gone; skip silently upstream.
    NotFound,
    /// 429 or 5xx, retry with backoff.
    Retryable,
    /// Any other status, fail immediately as malformed/unexpected.
    Fatal,
}

/// Classify a response status into its retry behavior.
pub fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status == StatusCode::NOT_FOUND {
        StatusClass::NotFound
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        StatusClass::Retryable
    } else {
        StatusClass::Fatal
    }
}
