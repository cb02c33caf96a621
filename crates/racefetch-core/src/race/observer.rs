//! Race lifecycle hooks
//!
//! The coordinator reports every attempt to a [`RaceObserver`] instead of
//! writing to a fixed output. [`TracingObserver`] is the default.

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::response::ProviderResponse;
use crate::types::ProviderDescriptor;

/// Receives race events; called inline on the racing task
pub trait RaceObserver: Send + Sync {
    fn attempt_started(&self, _provider: &ProviderDescriptor, _position: usize) {}

    fn attempt_failed(&self, provider: &ProviderDescriptor, position: usize, error: &Error);

    fn race_won(&self, _response: &ProviderResponse, _position: usize) {}
}

/// Logs race events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RaceObserver for TracingObserver {
    fn attempt_started(&self, provider: &ProviderDescriptor, position: usize) {
        debug!(provider = provider.name(), position, "Attempting provider");
    }

    fn attempt_failed(&self, provider: &ProviderDescriptor, position: usize, error: &Error) {
        warn!(
            provider = provider.name(),
            position,
            classification = ?error.classification(),
            "Provider attempt failed: {}",
            error
        );
    }

    fn race_won(&self, response: &ProviderResponse, position: usize) {
        info!(
            provider = %response.provider,
            position,
            status = response.response_status,
            "Provider won the race"
        );
    }
}
