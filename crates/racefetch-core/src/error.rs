//! Error types for the Racefetch core library
//!
//! Every failure a race can observe is one variant of [`Error`]. Per-provider
//! failures (transport, timeout, status, decoding, content type) are caught by
//! the coordinator and either turned into a fallback or returned untouched;
//! [`Error::Exhausted`] is the terminal failure of a whole race.

use std::time::Duration;
use thiserror::Error;

use crate::http::error::ErrorClassification;
use crate::race::FallbackAttempt;

/// Main error type for Racefetch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid provider list or policy options handed to the coordinator
    #[error("Construction error: {message}")]
    Construction { message: String },

    /// The effective request of a provider could not be built
    #[error("HTTP request error: {message}")]
    HttpRequest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The underlying HTTP call failed or was aborted
    #[error("Transport error from provider '{provider}': {message}")]
    Transport {
        provider: String,
        message: String,
        classification: ErrorClassification,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The per-attempt timer fired before the transport settled
    #[error("Provider '{provider}' timed out after {}ms", timeout.as_millis())]
    Timeout { provider: String, timeout: Duration },

    /// Non-success status rejected by policy
    #[error("Provider '{provider}' answered with status {status} ({classification:?})")]
    Status {
        provider: String,
        status: u16,
        classification: ErrorClassification,
    },

    /// The response body could not be read for the declared content type
    #[error("Failed to decode response from provider '{provider}': {message}")]
    Decode {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The declared content type is recognized but not supported
    #[error("Response type '{content_type}' of provider '{provider}' is not supported")]
    UnsupportedContentType {
        provider: String,
        content_type: String,
    },

    /// The declared content type is not one of the recognized tags
    #[error("Invalid response type '{content_type}' declared by provider '{provider}'")]
    InvalidContentType {
        provider: String,
        content_type: String,
    },

    /// Every provider in the race failed
    #[error("No providers available: {} attempt(s) failed", attempts.len())]
    Exhausted { attempts: Vec<FallbackAttempt> },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn construction(message: impl Into<String>) -> Self {
        Error::Construction {
            message: message.into(),
        }
    }

    pub(crate) fn decode(
        provider: &str,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Error::Decode {
            provider: provider.to_string(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Name of the provider this error belongs to, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Error::Transport { provider, .. }
            | Error::Timeout { provider, .. }
            | Error::Status { provider, .. }
            | Error::Decode { provider, .. }
            | Error::UnsupportedContentType { provider, .. }
            | Error::InvalidContentType { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Failure classification for diagnostics
    pub fn classification(&self) -> ErrorClassification {
        match self {
            Error::Transport { classification, .. } | Error::Status { classification, .. } => {
                *classification
            }
            Error::Timeout { .. } => ErrorClassification::TimeoutError,
            _ => ErrorClassification::Unknown,
        }
    }
}
