//! Records of failed attempts

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::http::error::ErrorClassification;

/// One provider attempt that failed during a race
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackAttempt {
    /// Provider name
    pub provider: String,
    /// Zero-based position in the race order
    pub position: usize,
    /// Rendered error
    pub error: String,
    pub classification: ErrorClassification,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl FallbackAttempt {
    pub fn new(
        provider: &str,
        position: usize,
        error: &Error,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            provider: provider.to_string(),
            position,
            error: error.to_string(),
            classification: error.classification(),
            started_at,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_from_error() {
        let error = Error::Timeout {
            provider: "slow".to_string(),
            timeout: Duration::from_millis(100),
        };
        let attempt = FallbackAttempt::new("slow", 1, &error, Utc::now(), Duration::from_millis(101));

        assert_eq!(attempt.provider, "slow");
        assert_eq!(attempt.position, 1);
        assert_eq!(attempt.classification, ErrorClassification::TimeoutError);
        assert!(attempt.error.contains("timed out"));

        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["classification"], "TimeoutError");
    }
}
