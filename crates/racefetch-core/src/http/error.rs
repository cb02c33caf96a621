//! HTTP error classification
//!
//! Classifies transport failures and response statuses so attempt reports
//! and logs can tell a dead endpoint from a throttled or misconfigured one.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Classification of a failed provider attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// Client errors (4xx)
    ClientError,
    /// Server errors (5xx)
    ServerError,
    /// Connection-level failures (DNS, refused, reset)
    NetworkError,
    /// Timeouts, either the per-attempt timer or the client's own
    TimeoutError,
    /// Rate limiting (429)
    RateLimitError,
    /// Authentication errors (401, 403)
    AuthenticationError,
    /// The attempt was aborted through its cancellation token
    Cancelled,
    /// Anything else
    Unknown,
}

impl ErrorClassification {
    /// Classify an HTTP status code
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => ErrorClassification::AuthenticationError,
            429 => ErrorClassification::RateLimitError,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }

    /// Classify a reqwest transport error
    pub fn from_request_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ErrorClassification::TimeoutError
        } else if error.is_connect() || error.is_request() {
            ErrorClassification::NetworkError
        } else if let Some(status) = error.status() {
            Self::from_status(status)
        } else {
            ErrorClassification::Unknown
        }
    }
}
