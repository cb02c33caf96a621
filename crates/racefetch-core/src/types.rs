//! Provider descriptors and the values derived from them
//!
//! A [`ProviderDescriptor`] describes one candidate endpoint of a race. It is
//! plain data: nothing is validated beyond field presence, and the request it
//! describes is rebuilt by [`ProviderDescriptor::effective_request`] every
//! time it is asked for.

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, Url};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Characters escaped in query values, matching `encodeURIComponent`
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Declared content type of a provider's response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `text/plain`
    Text,
    /// `text/xml`
    Xml,
    /// `application/octet-stream`
    OctetStream,
    /// `x-application/protobuf`
    Protobuf,
    /// Any other tag; kept as given and rejected when the response is parsed
    Other(String),
}

impl ResponseType {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseType::Json => "application/json",
            ResponseType::FormUrlEncoded => "application/x-www-form-urlencoded",
            ResponseType::Text => "text/plain",
            ResponseType::Xml => "text/xml",
            ResponseType::OctetStream => "application/octet-stream",
            ResponseType::Protobuf => "x-application/protobuf",
            ResponseType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ResponseType {
    fn from(tag: &str) -> Self {
        match tag {
            "application/json" => ResponseType::Json,
            "application/x-www-form-urlencoded" => ResponseType::FormUrlEncoded,
            "text/plain" => ResponseType::Text,
            "text/xml" => ResponseType::Xml,
            "application/octet-stream" => ResponseType::OctetStream,
            "x-application/protobuf" => ResponseType::Protobuf,
            other => ResponseType::Other(other.to_string()),
        }
    }
}

impl From<String> for ResponseType {
    fn from(tag: String) -> Self {
        ResponseType::from(tag.as_str())
    }
}

impl From<ResponseType> for String {
    fn from(response_type: ResponseType) -> Self {
        response_type.as_str().to_string()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of a provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Structured value; objects are JSON-encoded before sending
    Json(Value),
    /// Raw payload sent as-is
    #[serde(skip_deserializing)]
    Raw(Bytes),
}

/// Describes one candidate endpoint of a race
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    name: String,
    method: String,
    base_url: String,
    pathname: String,
    #[serde(default)]
    search_params: Option<IndexMap<String, String>>,
    #[serde(default)]
    body: Option<Body>,
    #[serde(default)]
    headers: Option<IndexMap<String, String>>,
    response_type: ResponseType,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Option<usize>,
}

/// Read-only view of the request a provider describes
#[derive(Debug, Clone)]
pub struct EffectiveRequest<'a> {
    pub method: Method,
    pub url: Url,
    pub pathname: &'a str,
    pub search_params: Option<&'a IndexMap<String, String>>,
    pub body: Option<&'a Body>,
    pub headers: Option<&'a IndexMap<String, String>>,
}

impl ProviderDescriptor {
    /// Create a descriptor with the required fields
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        base_url: impl Into<String>,
        pathname: impl Into<String>,
        response_type: impl Into<ResponseType>,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            base_url: base_url.into(),
            pathname: pathname.into(),
            search_params: None,
            body: None,
            headers: None,
            response_type: response_type.into(),
            priority: None,
        }
    }

    pub fn with_search_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_params
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_search_params(mut self, params: IndexMap<String, String>) -> Self {
        self.search_params = Some(params);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers_mut().insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: IndexMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json_body(self, body: Value) -> Self {
        self.with_body(Body::Json(body))
    }

    pub fn with_priority(mut self, priority: usize) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn search_params(&self) -> Option<&IndexMap<String, String>> {
        self.search_params.as_ref()
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Replace the body; the next effective request picks it up
    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    pub fn headers(&self) -> Option<&IndexMap<String, String>> {
        self.headers.as_ref()
    }

    /// Mutable access to the headers, creating an empty map if none were given
    pub fn headers_mut(&mut self) -> &mut IndexMap<String, String> {
        self.headers.get_or_insert_with(IndexMap::new)
    }

    pub fn response_type(&self) -> &ResponseType {
        &self.response_type
    }

    pub fn priority(&self) -> Option<usize> {
        self.priority
    }

    pub fn set_priority(&mut self, priority: usize) {
        self.priority = Some(priority);
    }

    /// Set the priority from an untyped value.
    ///
    /// Only non-negative finite numbers are taken (fractions truncate). Any
    /// other value is ignored and the current priority is kept.
    pub fn set_priority_value(&mut self, value: &Value) {
        if let Some(priority) = priority_from_value(value) {
            self.priority = Some(priority);
        }
    }

    pub fn clear_priority(&mut self) {
        self.priority = None;
    }

    /// Check that the required fields are present
    pub fn validate(&self) -> Result<()> {
        let missing = [
            ("name", &self.name),
            ("method", &self.method),
            ("baseUrl", &self.base_url),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(Error::construction(format!(
                "provider '{}' is missing required field '{}'",
                self.name, field
            ))),
            None => Ok(()),
        }
    }

    /// Build the request this provider describes
    pub fn effective_request(&self) -> Result<EffectiveRequest<'_>> {
        Ok(EffectiveRequest {
            method: parse_method(&self.method)?,
            url: self.build_url()?,
            pathname: &self.pathname,
            search_params: self.search_params.as_ref(),
            body: self.body.as_ref(),
            headers: self.headers.as_ref(),
        })
    }

    fn build_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| Error::HttpRequest {
            message: format!("Invalid base URL: {}", self.base_url),
            source: Some(Box::new(e)),
        })?;

        let mut url = base.join(&self.pathname).map_err(|e| Error::HttpRequest {
            message: format!("Failed to join path: {}", self.pathname),
            source: Some(Box::new(e)),
        })?;

        if let Some(params) = &self.search_params {
            let query = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(if query.is_empty() { None } else { Some(&query) });
        }

        Ok(url)
    }
}

/// Parse HTTP method from string
fn parse_method(method_str: &str) -> Result<Method> {
    Method::from_bytes(method_str.to_uppercase().as_bytes()).map_err(|e| Error::HttpRequest {
        message: format!("Invalid HTTP method: {}", method_str),
        source: Some(Box::new(e)),
    })
}

pub(crate) fn priority_from_value(value: &Value) -> Option<usize> {
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.trunc() as usize)
}

pub(crate) fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(priority_from_value))
}
