use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::domain::{Symbol, UtcDateTime};

/// One instrument in the analysis universe. Loaded once per run and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    /// Industry sector label; empty when the reference table carries none.
    pub sector: String,
    /// Chart API identifier, e.g. `RELIANCEEQN`.
    pub identifier: String,
}

impl Instrument {
    pub fn new(symbol: Symbol, sector: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            symbol,
            sector: sector.into(),
            identifier: identifier.into(),
        }
    }

    /// Builds an instrument with the conventional `<SYMBOL>EQN` identifier.
    pub fn with_default_identifier(symbol: Symbol, sector: impl Into<String>) -> Self {
        let identifier = format!("{symbol}EQN");
        Self::new(symbol, sector, identifier)
    }

    pub fn has_sector(&self) -> bool {
        !self.sector.trim().is_empty()
    }
}

/// Single observation in an intraday chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ts: UtcDateTime,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(ts: UtcDateTime, value: f64) -> Self {
        Self { ts, value }
    }
}

/// Intraday series for one instrument. May be empty and carries no ordering
/// or timestamp-uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Accepted nearest-sample match for one target instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub value: f64,
    /// Absolute distance between the target and the matched sample.
    pub distance: Duration,
}

/// Successful per-instrument result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub symbol: Symbol,
    pub sector: String,
    pub open_value: f64,
    pub close_value: f64,
    pub pct_change: f64,
}

/// Enumerated cause for an instrument that produced no change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// One or both snapshot targets had no sample within tolerance.
    MissingPrices,
    /// The open value makes the percentage change undefined.
    InvalidOpenPrice,
}

impl FailureReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingPrices => "missing_prices",
            Self::InvalidOpenPrice => "invalid_open_price",
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed per-instrument result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub symbol: Symbol,
    pub identifier: String,
    pub reason: FailureReason,
    /// Transport diagnostic for the failures report, when a fetch error was
    /// behind the missing data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Mean percentage change across the change records of one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector: String,
    pub avg_pct_change: f64,
    /// Number of change records contributing to the mean.
    pub records: usize,
}
