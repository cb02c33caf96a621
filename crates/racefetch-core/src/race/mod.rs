//! Provider racing
//!
//! A race walks the providers in priority-insertion order, making one attempt
//! per provider, and returns the first normalized response. Failures fall
//! through to the next provider when [`RaceOptions::retry_on_fail`] is set.

pub mod coordinator;
pub mod fallback;
pub mod observer;
pub mod options;
pub mod ordering;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::ProviderDescriptor;

pub use coordinator::RaceCoordinator;
pub use fallback::FallbackAttempt;
pub use observer::{RaceObserver, TracingObserver};
pub use options::RaceOptions;
pub use ordering::priority_order;

/// Providers handed to a coordinator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderSet {
    /// Priority taken from each descriptor
    List(Vec<ProviderDescriptor>),
    /// Priority taken from the entry and written into its descriptor
    Keyed(IndexMap<String, KeyedProvider>),
}

/// Entry of a keyed provider set
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyedProvider {
    pub provider: ProviderDescriptor,
    #[serde(default, deserialize_with = "crate::types::lenient_priority")]
    pub priority: Option<usize>,
}

impl KeyedProvider {
    pub fn new(provider: ProviderDescriptor, priority: Option<usize>) -> Self {
        Self { provider, priority }
    }
}

impl ProviderSet {
    /// Parse either shape from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_array() && !value.is_object() {
            return Err(Error::construction(
                "providers must be a list or a keyed mapping",
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::construction(format!("invalid provider set: {}", e)))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::List(providers) => providers.len(),
            Self::Keyed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into descriptors, keyed entries in insertion order.
    ///
    /// A keyed entry without a priority leaves its descriptor's own value.
    pub fn into_descriptors(self) -> Vec<ProviderDescriptor> {
        match self {
            Self::List(providers) => providers,
            Self::Keyed(entries) => entries
                .into_values()
                .map(|entry| {
                    let mut provider = entry.provider;
                    if let Some(priority) = entry.priority {
                        provider.set_priority(priority);
                    }
                    provider
                })
                .collect(),
        }
    }
}

impl From<Vec<ProviderDescriptor>> for ProviderSet {
    fn from(providers: Vec<ProviderDescriptor>) -> Self {
        Self::List(providers)
    }
}

impl From<IndexMap<String, KeyedProvider>> for ProviderSet {
    fn from(entries: IndexMap<String, KeyedProvider>) -> Self {
        Self::Keyed(entries)
    }
}
