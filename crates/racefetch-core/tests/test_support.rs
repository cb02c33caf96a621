//! Shared test support utilities for integration tests

#![allow(dead_code)]

use racefetch_core::ProviderDescriptor;
use wiremock::MockServer;

/// GET provider pointed at a mock server
pub fn json_provider(name: &str, server: &MockServer, pathname: &str) -> ProviderDescriptor {
    ProviderDescriptor::new(name, "GET", server.uri(), pathname, "application/json")
}

/// Provider with an explicit method and response type
pub fn provider(
    name: &str,
    method: &str,
    server: &MockServer,
    pathname: &str,
    response_type: &str,
) -> ProviderDescriptor {
    ProviderDescriptor::new(name, method, server.uri(), pathname, response_type)
}

/// Base URL nothing listens on
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:9".to_string()
}
