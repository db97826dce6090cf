use std::path::Path;

use sectorscope_core::{AnalysisReport, SectorAggregate, UtcDateTime};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Metadata attached to machine-readable report output.
#[derive(Debug, Serialize)]
struct ReportMeta {
    request_id: String,
    generated_at: UtcDateTime,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    meta: ReportMeta,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

pub fn render(report: &AnalysisReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let document = ReportDocument {
                meta: ReportMeta {
                    request_id: Uuid::new_v4().to_string(),
                    generated_at: UtcDateTime::now(),
                },
                report,
            };
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(report),
    }

    Ok(())
}

fn render_table(report: &AnalysisReport) {
    if !report.has_results() {
        println!(
            "No valid data fetched for {} ({} failures); see the failures report.",
            report.date,
            report.failures.len()
        );
        return;
    }

    println!("📈 Top gaining sectors ({}):", report.date);
    render_sector_rows(&report.gainers);

    println!();
    println!("📉 Top losing sectors ({}):", report.date);
    render_sector_rows(&report.losers);

    println!();
    println!(
        "{} instruments analyzed: {} changes, {} failures across {} sectors.",
        report.changes.len() + report.failures.len(),
        report.changes.len(),
        report.failures.len(),
        report.sectors.len()
    );
}

fn render_sector_rows(aggregates: &[SectorAggregate]) {
    for aggregate in aggregates {
        println!(
            "  {:<42} {:>+9.3}%  ({} stocks)",
            aggregate.sector, aggregate.avg_pct_change, aggregate.records
        );
    }
}

/// Writes the three per-run CSV artifacts into `out_dir`.
pub fn persist_report(report: &AnalysisReport, out_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(out_dir)?;

    let changes_path = out_dir.join(format!("intraday_stock_changes_{}.csv", report.date));
    write_changes(report, &changes_path)?;

    let sectors_path = out_dir.join(format!("sector_avg_changes_{}.csv", report.date));
    write_sectors(report, &sectors_path)?;

    let failures_path = out_dir.join(format!("failures_{}.csv", report.date));
    write_failures(report, &failures_path)?;

    info!(
        changes = %changes_path.display(),
        sectors = %sectors_path.display(),
        failures = %failures_path.display(),
        "run reports written"
    );
    Ok(())
}

fn write_changes(report: &AnalysisReport, path: &Path) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["symbol", "sector", "open_value", "close_value", "pct_change"])?;
    for record in &report.changes {
        writer.write_record([
            &record.symbol.to_string(),
            &record.sector,
            &format!("{:.6}", record.open_value),
            &format!("{:.6}", record.close_value),
            &format!("{:.6}", record.pct_change),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_sectors(report: &AnalysisReport, path: &Path) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["sector", "avg_pct_change", "records"])?;
    for aggregate in &report.sectors {
        writer.write_record([
            &aggregate.sector,
            &format!("{:.6}", aggregate.avg_pct_change),
            &aggregate.records.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_failures(report: &AnalysisReport, path: &Path) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["symbol", "identifier", "reason", "detail"])?;
    for failure in &report.failures {
        writer.write_record([
            &failure.symbol.to_string(),
            &failure.identifier,
            &failure.reason.to_string(),
            &failure.detail.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
