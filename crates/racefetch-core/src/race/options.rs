//! Race policy options

use std::time::Duration;

use crate::error::{Error, Result};

/// Policy applied by the coordinator to one race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceOptions {
    /// Deadline for each provider's transport call
    pub timeout_per_attempt: Option<Duration>,

    /// On failure, fall through to the next provider in race order.
    ///
    /// Despite the name the failed provider is not attempted again. When
    /// disabled, the first failure ends the race with that error.
    pub retry_on_fail: bool,

    /// Treat non-2xx statuses as failed attempts
    pub reject_error_status: bool,

    /// Reserved; accepted and validated but not enforced
    pub timeout: Option<Duration>,

    /// Reserved; accepted and validated but not enforced
    pub max_attempts: Option<u32>,

    /// Reserved; accepted and validated but not enforced
    pub max_retry: Option<u32>,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            timeout_per_attempt: None,
            retry_on_fail: true,
            reject_error_status: false,
            timeout: None,
            max_attempts: None,
            max_retry: None,
        }
    }
}

impl RaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout_per_attempt(mut self, timeout: Duration) -> Self {
        self.timeout_per_attempt = Some(timeout);
        self
    }

    pub fn with_retry_on_fail(mut self, retry_on_fail: bool) -> Self {
        self.retry_on_fail = retry_on_fail;
        self
    }

    pub fn with_reject_error_status(mut self, reject: bool) -> Self {
        self.reject_error_status = reject;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = Some(max_retry);
        self
    }

    /// Names of the reserved options that were set
    pub fn reserved_in_use(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.timeout.is_some() {
            names.push("timeout");
        }
        if self.max_attempts.is_some() {
            names.push("max_attempts");
        }
        if self.max_retry.is_some() {
            names.push("max_retry");
        }
        names
    }

    /// Validate option values
    pub fn validate(&self) -> Result<()> {
        if self.timeout_per_attempt.is_some_and(|t| t.is_zero()) {
            return Err(Error::construction("timeout_per_attempt cannot be zero"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::construction("timeout cannot be zero"));
        }

        if self.max_attempts == Some(0) {
            return Err(Error::construction("max_attempts cannot be zero"));
        }

        Ok(())
    }
}
