//! Response normalization
//!
//! Converts a raw transport response into a [`ProviderResponse`] according to
//! the provider's declared [`ResponseType`]. Unsupported and unrecognized
//! types are rejected before the response is looked at.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::http::transport::RawResponse;
use crate::response::ProviderResponse;
use crate::types::{ProviderDescriptor, ResponseType};

/// Body reader selected by the declared response type
enum BodyKind {
    Json,
    Form,
    Text,
    Xml,
}

/// Normalize a provider response
pub async fn normalize_response(
    provider: &ProviderDescriptor,
    response: Box<dyn RawResponse>,
) -> Result<ProviderResponse> {
    let name = provider.name();

    let kind = match provider.response_type() {
        ResponseType::Json => BodyKind::Json,
        ResponseType::FormUrlEncoded => BodyKind::Form,
        ResponseType::Text => BodyKind::Text,
        ResponseType::Xml => BodyKind::Xml,
        ResponseType::OctetStream | ResponseType::Protobuf => {
            return Err(Error::UnsupportedContentType {
                provider: name.to_string(),
                content_type: provider.response_type().to_string(),
            });
        }
        ResponseType::Other(tag) => {
            return Err(Error::InvalidContentType {
                provider: name.to_string(),
                content_type: tag.clone(),
            });
        }
    };

    let response_status = response.status();
    let response_headers = collect_headers(response.headers());

    let payload = match kind {
        BodyKind::Json => response
            .json()
            .await
            .map_err(|e| Error::decode(name, "invalid JSON body", e))?,
        BodyKind::Form => {
            let fields = response
                .form_data()
                .await
                .map_err(|e| Error::decode(name, "invalid form body", e))?;
            form_to_value(fields)
        }
        BodyKind::Text => {
            let text = response
                .text()
                .await
                .map_err(|e| Error::decode(name, "unreadable text body", e))?;
            json!({ "$text": text })
        }
        BodyKind::Xml => {
            let text = response
                .text()
                .await
                .map_err(|e| Error::decode(name, "unreadable XML body", e))?;
            json!({ "$xml": text })
        }
    };

    Ok(ProviderResponse {
        payload,
        provider: name.to_string(),
        response_status,
        response_headers,
    })
}

/// Fold header pairs into a map; repeated names are joined with `", "`
pub fn collect_headers(pairs: Vec<(String, String)>) -> IndexMap<String, String> {
    let mut headers: IndexMap<String, String> = IndexMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        match headers.get_mut(&name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                headers.insert(name, value);
            }
        }
    }
    headers
}

/// Form fields as a JSON object of strings; the last duplicate wins
fn form_to_value(fields: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (name, value) in fields {
        object.insert(name, Value::String(value));
    }
    Value::Object(object)
}
