//! Race coordinator

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::client::ReqwestTransport;
use crate::http::error::ErrorClassification;
use crate::http::normalizer::normalize_response;
use crate::http::timeout::with_attempt_timeout;
use crate::http::transport::{ProviderTransport, RawResponse, Transport, TransportRequest};
use crate::race::fallback::FallbackAttempt;
use crate::race::observer::{RaceObserver, TracingObserver};
use crate::race::options::RaceOptions;
use crate::race::ordering::priority_order;
use crate::race::ProviderSet;
use crate::response::ProviderResponse;
use crate::types::ProviderDescriptor;

/// Races a set of providers under one [`RaceOptions`] policy
pub struct RaceCoordinator {
    providers: Vec<ProviderDescriptor>,
    options: RaceOptions,
    transport: Arc<dyn Transport>,
    custom_transport: Option<Arc<dyn ProviderTransport>>,
    observer: Arc<dyn RaceObserver>,
}

impl RaceCoordinator {
    /// Create a coordinator using the default reqwest transport
    pub fn new(providers: impl Into<ProviderSet>, options: RaceOptions) -> Result<Self> {
        options.validate()?;

        let providers = providers.into().into_descriptors();
        for provider in &providers {
            provider.validate()?;
        }

        let reserved = options.reserved_in_use();
        if !reserved.is_empty() {
            debug!(options = ?reserved, "Reserved race options are set but not enforced");
        }

        Ok(Self {
            providers,
            options,
            transport: Arc::new(ReqwestTransport::with_default_config()?),
            custom_transport: None,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the transport used for resolved requests
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Hand every attempt to `transport` instead of the request transport
    pub fn with_custom_transport(mut self, transport: Arc<dyn ProviderTransport>) -> Self {
        self.custom_transport = Some(transport);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RaceObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// First provider named `name`
    pub fn provider_mut(&mut self, name: &str) -> Option<&mut ProviderDescriptor> {
        self.providers.iter_mut().find(|p| p.name() == name)
    }

    pub fn options(&self) -> &RaceOptions {
        &self.options
    }

    /// Providers in the order the next race will try them
    pub fn ordered_providers(&self) -> Vec<&ProviderDescriptor> {
        priority_order(&self.providers)
    }

    /// Run one race.
    ///
    /// Providers are attempted one at a time. The first normalized response
    /// wins and no later provider is contacted. With `retry_on_fail` off the
    /// first failure is returned as is; otherwise running out of providers
    /// yields [`Error::Exhausted`] carrying every failed attempt.
    pub async fn run(&self) -> Result<ProviderResponse> {
        let order = self.ordered_providers();
        debug!(
            order = ?order.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Starting race"
        );

        let mut attempts = Vec::with_capacity(order.len());

        for (position, provider) in order.into_iter().enumerate() {
            self.observer.attempt_started(provider, position);
            let started_at = Utc::now();
            let clock = Instant::now();

            match self.attempt(provider).await {
                Ok(response) => {
                    self.observer.race_won(&response, position);
                    return Ok(response);
                }
                Err(error) => {
                    self.observer.attempt_failed(provider, position, &error);
                    if !self.options.retry_on_fail {
                        return Err(error);
                    }
                    attempts.push(FallbackAttempt::new(
                        provider.name(),
                        position,
                        &error,
                        started_at,
                        clock.elapsed(),
                    ));
                }
            }
        }

        Err(Error::Exhausted { attempts })
    }

    async fn attempt(&self, provider: &ProviderDescriptor) -> Result<ProviderResponse> {
        let response = match self.options.timeout_per_attempt {
            Some(limit) => {
                let signal = CancellationToken::new();
                with_attempt_timeout(
                    self.dispatch(provider, Some(signal.clone())),
                    limit,
                    &signal,
                    provider.name(),
                )
                .await?
            }
            None => self.dispatch(provider, None).await?,
        };

        if self.options.reject_error_status {
            check_status(provider, response.as_ref())?;
        }

        normalize_response(provider, response).await
    }

    async fn dispatch(
        &self,
        provider: &ProviderDescriptor,
        signal: Option<CancellationToken>,
    ) -> Result<Box<dyn RawResponse>> {
        match &self.custom_transport {
            Some(custom) => {
                // unbuildable providers fail before reaching the override
                provider.effective_request()?;
                custom.call(provider, signal).await
            }
            None => {
                let request = TransportRequest::from_provider(provider)?;
                self.transport.fetch(request, signal).await
            }
        }
    }
}

fn check_status(provider: &ProviderDescriptor, response: &dyn RawResponse) -> Result<()> {
    let status = response.status();
    if (200..300).contains(&status) {
        return Ok(());
    }

    let classification = StatusCode::from_u16(status)
        .map(ErrorClassification::from_status)
        .unwrap_or(ErrorClassification::Unknown);

    Err(Error::Status {
        provider: provider.name().to_string(),
        status,
        classification,
    })
}
