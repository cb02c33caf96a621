//! Request building
//!
//! Turns a provider's effective request into a [`TransportRequest`] and a
//! transport request into a `reqwest::Request`.

use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::transport::TransportRequest;
use crate::types::{Body, ProviderDescriptor};
use crate::util::{is_plain_object, safe_json_stringify};

/// Encode a provider body for the wire.
///
/// Objects go through [`safe_json_stringify`] and fall back to `{}`; strings
/// are sent as their text; `null` sends nothing; other values are sent as
/// their JSON text.
pub fn prepare_body(body: Option<&Body>) -> Option<Bytes> {
    match body? {
        Body::Raw(bytes) => Some(bytes.clone()),
        Body::Json(value) if is_plain_object(value) => Some(Bytes::from(
            safe_json_stringify(value).unwrap_or_else(|| "{}".to_string()),
        )),
        Body::Json(Value::Null) => None,
        Body::Json(Value::String(text)) => Some(Bytes::from(text.clone())),
        Body::Json(other) => Some(Bytes::from(other.to_string())),
    }
}

impl TransportRequest {
    /// Resolve the request a provider describes
    pub fn from_provider(provider: &ProviderDescriptor) -> Result<Self> {
        let effective = provider.effective_request()?;

        Ok(Self {
            provider: provider.name().to_string(),
            method: effective.method,
            url: effective.url,
            headers: effective.headers.cloned().unwrap_or_default(),
            body: prepare_body(effective.body),
        })
    }

    /// Build a reqwest request; headers are sent exactly as given
    pub fn to_reqwest(&self, client: &Client) -> Result<reqwest::Request> {
        let mut request_builder = client.request(self.method.clone(), self.url.clone());

        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| Error::HttpRequest {
                message: format!("Invalid header name '{}' for provider '{}'", key, self.provider),
                source: Some(Box::new(e)),
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| Error::HttpRequest {
                message: format!("Invalid value for header '{}' of provider '{}'", key, self.provider),
                source: Some(Box::new(e)),
            })?;
            request_builder = request_builder.header(name, value);
        }

        if let Some(body) = &self.body {
            request_builder = request_builder.body(body.clone());
        }

        request_builder.build().map_err(|e| Error::HttpRequest {
            message: format!("Failed to build request: {}", e),
            source: Some(Box::new(e)),
        })
    }
}
