//! CLI argument definitions for sectorscope.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// sectorscope - NSE intraday sector performance CLI
///
/// Fetches intraday chart data for a stock universe, snapshots each
/// instrument at two exchange wall-clock targets, and ranks sector
/// performance by mean percentage change.
#[derive(Debug, Parser)]
#[command(
    name = "sectorscope",
    author,
    version,
    about = "NSE intraday sector performance CLI",
    long_about = "sectorscope answers \"which sectors moved most today\": it fetches intraday \
chart data for every instrument in a reference universe, snapshots each one at two IST \
wall-clock targets (09:15 and 12:15 by default), computes per-stock percentage change, and \
ranks sectors by their mean change.\n\
\n\
Use 'sectorscope <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: ranked gainers/losers for terminal display (default)
    /// - json: the full run report as a single JSON object
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Ranked sector tables for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 📊 Analyze intraday sector performance for one trading day.
    ///
    /// Loads the universe table, fetches each instrument's intraday chart,
    /// snapshots the open/close targets, and writes the per-run CSV reports.
    ///
    /// # Examples
    ///
    ///   sectorscope analyze --date 2024-06-03
    ///   sectorscope analyze --universe nifty500_stocks.csv --out-dir reports
    ///   sectorscope analyze --format json --pretty
    Analyze(AnalyzeArgs),

    /// 📦 Universe reference table commands.
    Universe(UniverseArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Trading date in YYYY-MM-DD (IST wall clock). Defaults to today in IST.
    #[arg(long)]
    pub date: Option<String>,

    /// Universe reference table (CSV with symbol, sector, nse_identifier).
    #[arg(long, default_value = "nifty500_stocks.csv")]
    pub universe: PathBuf,

    /// Directory where the per-run CSV reports are written.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Morning snapshot target, HH:MM on the exchange wall clock.
    #[arg(long, default_value = "09:15")]
    pub open_time: String,

    /// Midday snapshot target, HH:MM on the exchange wall clock.
    #[arg(long, default_value = "12:15")]
    pub close_time: String,

    /// Maximum accepted distance between a target and its nearest sample,
    /// in seconds.
    #[arg(long, default_value_t = 120)]
    pub tolerance_secs: u32,

    /// Concurrent fetch workers.
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Upstream request budget per second, shared across all workers.
    #[arg(long, default_value_t = 12)]
    pub requests_per_second: u32,

    /// Directory for raw chart payload copies (disabled when omitted).
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Override the NSE base URL (e.g. a local stub while testing).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for the `universe` command group.
#[derive(Debug, Args)]
pub struct UniverseArgs {
    #[command(subcommand)]
    pub command: UniverseCommand,
}

/// Universe management subcommands.
#[derive(Debug, Subcommand)]
pub enum UniverseCommand {
    /// Fetch index constituents from NSE and write the universe CSV.
    ///
    /// # Examples
    ///
    ///   sectorscope universe fetch
    ///   sectorscope universe fetch --index "NIFTY 50" --out nifty50.csv
    Fetch(UniverseFetchArgs),
}

/// Arguments for `universe fetch`.
#[derive(Debug, Args)]
pub struct UniverseFetchArgs {
    /// Index whose constituents form the universe.
    #[arg(long, default_value = "NIFTY 500")]
    pub index: String,

    /// Output CSV path.
    #[arg(long, default_value = "nifty500_stocks.csv")]
    pub out: PathBuf,

    /// Override the NSE base URL (e.g. a local stub while testing).
    #[arg(long)]
    pub base_url: Option<String>,
}
