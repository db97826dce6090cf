use std::sync::Arc;

use sectorscope_core::{
    parse_time_of_day, AnalysisConfig, AnalysisRunner, NseAdapter, RawAudit, ReqwestHttpClient,
    TradingWindow, Universe,
};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn run(args: &AnalyzeArgs, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let window = resolve_window(args)?;
    let universe = Universe::from_csv_path(&args.universe)?;
    if universe.is_empty() {
        warn!(path = %args.universe.display(), "universe table has no usable rows");
    }

    let config = AnalysisConfig {
        tolerance: time::Duration::seconds(i64::from(args.tolerance_secs)),
        concurrency: args.concurrency,
        quota_limit: args.requests_per_second,
        ..AnalysisConfig::default()
    };

    let mut adapter = NseAdapter::new(Arc::new(ReqwestHttpClient::new()));
    if let Some(base_url) = &args.base_url {
        adapter = adapter.with_base_url(base_url);
    }
    if let Some(raw_dir) = &args.raw_dir {
        std::fs::create_dir_all(raw_dir)?;
        adapter = adapter.with_audit(RawAudit {
            dir: raw_dir.clone(),
            date_tag: window.date_tag(),
        });
    }

    let runner = AnalysisRunner::new(Arc::new(adapter), &config)?;
    info!(
        date = %window.date_tag(),
        instruments = universe.len(),
        "running intraday sector analysis"
    );

    let report = runner.run(&universe, &window).await?;

    output::persist_report(&report, &args.out_dir)?;
    output::render(&report, format, pretty)
}

fn resolve_window(args: &AnalyzeArgs) -> Result<TradingWindow, CliError> {
    let open = parse_time_of_day(&args.open_time)?;
    let close = parse_time_of_day(&args.close_time)?;
    let window = match &args.date {
        Some(value) => TradingWindow::for_date_str(value, open, close)?,
        None => TradingWindow::today(open, close),
    };
    Ok(window)
}
