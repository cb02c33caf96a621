//! HTTP plumbing for provider attempts
//!
//! This module provides:
//! - The transport seam (`Transport`, `ProviderTransport`, `RawResponse`)
//! - A reqwest-backed default transport
//! - Request building from provider descriptors
//! - The per-attempt timer
//! - Response normalization and error classification

pub mod builder;
pub mod client;
pub mod error;
pub mod normalizer;
pub mod timeout;
pub mod transport;

pub use builder::prepare_body;
pub use client::{ReqwestResponse, ReqwestTransport, TransportConfig};
pub use error::ErrorClassification;
pub use normalizer::normalize_response;
pub use timeout::with_attempt_timeout;
pub use transport::{
    BufferedResponse, ProviderTransport, RawResponse, Transport, TransportRequest,
};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
