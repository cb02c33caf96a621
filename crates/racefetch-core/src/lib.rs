//! Racefetch Core - Request racing with ordered fallback
//!
//! This crate issues one HTTP request per provider, in priority order, until a
//! provider answers, and normalizes the answer into a single result shape.
//!
//! # Main Components
//!
//! - **Provider Descriptors**: endpoint, query, body, headers and declared response type
//! - **Race Coordinator**: priority-insertion ordering, per-attempt timeout, fallback
//! - **Transports**: reqwest by default, replaceable through the `Transport` trait
//! - **Response Normalization**: JSON, form, text and XML payloads into `ProviderResponse`
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use racefetch_core::{ProviderDescriptor, RaceCoordinator, RaceOptions, Result};
//!
//! async fn example() -> Result<()> {
//!     let providers = vec![
//!         ProviderDescriptor::new("primary", "GET", "https://a.example.com", "/rates", "application/json"),
//!         ProviderDescriptor::new("mirror", "GET", "https://b.example.com", "/rates", "application/json"),
//!     ];
//!
//!     let race = RaceCoordinator::new(
//!         providers,
//!         RaceOptions::new().with_timeout_per_attempt(Duration::from_millis(500)),
//!     )?;
//!
//!     let response = race.run().await?;
//!     println!("{} answered {}", response.provider, response.payload);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod race;
pub mod response;
pub mod types;
pub mod util;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use http::{ErrorClassification, ProviderTransport, RawResponse, Transport};
pub use race::{
    FallbackAttempt, KeyedProvider, ProviderSet, RaceCoordinator, RaceObserver, RaceOptions,
    TracingObserver,
};
pub use response::ProviderResponse;
pub use types::{Body, EffectiveRequest, ProviderDescriptor, ResponseType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
