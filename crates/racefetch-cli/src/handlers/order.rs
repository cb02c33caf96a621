//! Order command handler

use crate::cli::OrderArgs;
use crate::config::RaceFile;
use crate::error::Result;
use crate::logging::redaction::{redact_header, redact_sensitive};
use crate::output::{OrderEntry, OutputWriter};
use racefetch_core::{ProviderDescriptor, RaceCoordinator, RaceOptions};
use tracing::instrument;

/// Handle the order command; nothing is sent
#[instrument(skip(args, output), fields(file = ?args.file))]
pub fn handle_order(args: OrderArgs, output: &mut OutputWriter) -> Result<()> {
    let race_file = RaceFile::load(args.file.as_deref())?;
    let coordinator = RaceCoordinator::new(race_file.providers, RaceOptions::default())?;

    let entries = coordinator
        .ordered_providers()
        .into_iter()
        .enumerate()
        .map(|(position, provider)| order_entry(position, provider))
        .collect::<Result<Vec<_>>>()?;

    output.section("Race Order")?;
    output.order(&entries)
}

fn order_entry(position: usize, provider: &ProviderDescriptor) -> Result<OrderEntry> {
    let request = provider.effective_request()?;

    let headers: Vec<(String, String)> = request
        .headers
        .map(|headers| {
            headers
                .iter()
                .map(|(name, value)| (name.clone(), redact_header(name, value)))
                .collect()
        })
        .unwrap_or_default();

    Ok(OrderEntry {
        position,
        name: provider.name().to_string(),
        method: request.method.to_string(),
        url: redact_sensitive(request.url.as_str()),
        priority: provider.priority(),
        headers,
    })
}
