use std::sync::Arc;

use sectorscope_core::{MarketDataSource, NseAdapter, ReqwestHttpClient, Universe};
use tracing::info;

use crate::cli::{UniverseArgs, UniverseCommand, UniverseFetchArgs};
use crate::error::CliError;

pub async fn run(args: &UniverseArgs) -> Result<(), CliError> {
    match &args.command {
        UniverseCommand::Fetch(fetch) => run_fetch(fetch).await,
    }
}

async fn run_fetch(args: &UniverseFetchArgs) -> Result<(), CliError> {
    let mut adapter = NseAdapter::new(Arc::new(ReqwestHttpClient::new()));
    if let Some(base_url) = &args.base_url {
        adapter = adapter.with_base_url(base_url);
    }

    adapter.prime().await?;
    let instruments = adapter.index_constituents(&args.index).await?;
    let universe = Universe::from_instruments(instruments);
    if universe.is_empty() {
        return Err(CliError::Command(format!(
            "index '{}' returned no usable constituents",
            args.index
        )));
    }

    universe.to_csv_path(&args.out)?;
    info!(
        index = %args.index,
        rows = universe.len(),
        out = %args.out.display(),
        "universe table written"
    );
    println!("saved {} rows -> {}", universe.len(), args.out.display());
    Ok(())
}
