//! The normalized result of a won race

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result produced by the first provider that succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    /// Normalized payload; its shape depends on the declared response type
    pub payload: Value,
    /// Name of the provider that produced the result
    pub provider: String,
    /// HTTP status of the underlying response
    pub response_status: u16,
    /// Response headers as received
    pub response_headers: IndexMap<String, String>,
}

impl ProviderResponse {
    /// Text body of a `text/plain` response
    pub fn text(&self) -> Option<&str> {
        self.payload.get("$text").and_then(Value::as_str)
    }

    /// Raw document of a `text/xml` response
    pub fn xml(&self) -> Option<&str> {
        self.payload.get("$xml").and_then(Value::as_str)
    }

    /// Look up a response header by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.response_status)
    }
}
