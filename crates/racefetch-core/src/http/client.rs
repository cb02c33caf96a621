//! Default transport backed by `reqwest`

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::error::ErrorClassification;
use crate::http::transport::{BodyResult, RawResponse, Transport, TransportRequest};

/// Configuration for the reqwest client
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Time allowed to establish a connection
    pub connect_timeout: Option<Duration>,
    /// Whether to validate TLS certificates
    pub validate_tls: bool,
    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            validate_tls: true,
            user_agent: Some(format!("racefetch/{}", crate::VERSION)),
        }
    }
}

/// Transport issuing real HTTP requests
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder().danger_accept_invalid_certs(!config.validate_tls);

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder.build().map_err(|e| Error::HttpRequest {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { client })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(TransportConfig::default())
    }

    /// Wrap an already configured client
    pub fn from_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(
        &self,
        request: TransportRequest,
        signal: Option<CancellationToken>,
    ) -> Result<Box<dyn RawResponse>> {
        let built = request.to_reqwest(&self.client)?;
        debug!(provider = %request.provider, method = %request.method, url = %request.url, "Sending request");

        let send = self.client.execute(built);
        let result = match signal {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(Error::Transport {
                        provider: request.provider.clone(),
                        message: "request aborted".to_string(),
                        classification: ErrorClassification::Cancelled,
                        source: None,
                    });
                }
                result = send => result,
            },
            None => send.await,
        };

        let response = result.map_err(|e| Error::Transport {
            provider: request.provider.clone(),
            message: e.to_string(),
            classification: ErrorClassification::from_request_error(&e),
            source: Some(Box::new(e)),
        })?;

        Ok(Box::new(ReqwestResponse(response)))
    }
}

/// `reqwest::Response` as a [`RawResponse`]
#[derive(Debug)]
pub struct ReqwestResponse(pub reqwest::Response);

#[async_trait]
impl RawResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.0
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    async fn text(self: Box<Self>) -> BodyResult<String> {
        Ok(self.0.text().await?)
    }

    async fn bytes(self: Box<Self>) -> BodyResult<Bytes> {
        Ok(self.0.bytes().await?)
    }
}
