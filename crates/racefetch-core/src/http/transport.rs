//! Transport seam between the race coordinator and the network
//!
//! The coordinator only ever talks to a [`Transport`] (or a custom
//! [`ProviderTransport`] override) and reads answers through [`RawResponse`].
//! The reqwest-backed implementation lives in [`crate::http::client`];
//! [`BufferedResponse`] is an in-memory response for custom transports.

use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;
use reqwest::{Method, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::ProviderDescriptor;

/// Error type of body readers; the normalizer attaches the provider name
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of reading a response body
pub type BodyResult<T> = std::result::Result<T, BoxError>;

/// Fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Provider the request was built from, for diagnostics
    pub provider: String,
    pub method: Method,
    pub url: Url,
    pub headers: IndexMap<String, String>,
    pub body: Option<Bytes>,
}

/// Response as seen by the normalizer.
///
/// Status and headers are available without touching the body. Body readers
/// consume the response.
#[async_trait]
pub trait RawResponse: Send {
    fn status(&self) -> u16;

    /// Header name/value pairs in arrival order; repeated names appear repeatedly
    fn headers(&self) -> Vec<(String, String)>;

    async fn text(self: Box<Self>) -> BodyResult<String>;

    /// Raw body bytes; defaults to the text body
    async fn bytes(self: Box<Self>) -> BodyResult<Bytes> {
        Ok(Bytes::from(self.text().await?))
    }

    async fn json(self: Box<Self>) -> BodyResult<Value> {
        let text = self.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Form field entries in body order.
    ///
    /// A `multipart/form-data` content type is split into its parts, with
    /// every part (files included) read as a string. Any other body is
    /// parsed as `application/x-www-form-urlencoded`.
    async fn form_data(self: Box<Self>) -> BodyResult<Vec<(String, String)>> {
        let content_type = self
            .headers()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value);
        let body = self.bytes().await?;

        match content_type.filter(|value| is_multipart(value)) {
            Some(content_type) => multipart_fields(&content_type, body).await,
            None => Ok(url::form_urlencoded::parse(&body).into_owned().collect()),
        }
    }
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
}

async fn multipart_fields(content_type: &str, body: Bytes) -> BodyResult<Vec<(String, String)>> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures_util::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        // unnamed parts have no key to land under
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.bytes().await?;
        fields.push((name, String::from_utf8_lossy(&value).into_owned()));
    }
    Ok(fields)
}

/// Issues a resolved request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`; when `signal` is given, cancelling it must abort the call
    async fn fetch(
        &self,
        request: TransportRequest,
        signal: Option<CancellationToken>,
    ) -> Result<Box<dyn RawResponse>>;
}

/// Custom override that receives the provider itself instead of a resolved request
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    async fn call(
        &self,
        provider: &ProviderDescriptor,
        signal: Option<CancellationToken>,
    ) -> Result<Box<dyn RawResponse>>;
}

/// In-memory response
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl BufferedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// JSON response with a matching content type
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn boxed(self) -> Box<dyn RawResponse> {
        Box::new(self)
    }
}

#[async_trait]
impl RawResponse for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }

    async fn text(self: Box<Self>) -> BodyResult<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    async fn bytes(self: Box<Self>) -> BodyResult<Bytes> {
        Ok(self.body)
    }
}
