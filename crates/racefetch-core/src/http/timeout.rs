//! Per-attempt timer
//!
//! Races one transport call against `tokio::time::timeout`. When the timer
//! wins, the attempt's cancellation token is cancelled so transports that
//! spawned their own work can stop, and the attempt fails with
//! [`Error::Timeout`].

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};

/// Run `future` with a deadline of `limit`
pub async fn with_attempt_timeout<F, T>(
    future: F,
    limit: Duration,
    signal: &CancellationToken,
    provider: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_elapsed) => {
            debug!(provider, timeout_ms = limit.as_millis() as u64, "Attempt timer fired");
            signal.cancel();
            Err(Error::Timeout {
                provider: provider.to_string(),
                timeout: limit,
            })
        }
    }
}
