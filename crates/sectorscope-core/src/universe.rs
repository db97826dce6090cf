//! Reference universe loading and persistence.
//!
//! The universe is a CSV table with `symbol,sector,nse_identifier` columns.
//! Rows without a parseable symbol are skipped, duplicate symbols keep their
//! first occurrence, and a missing identifier defaults to `<SYMBOL>EQN`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Instrument, Symbol};

/// Universe table errors.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write universe table: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct UniverseRow {
    symbol: Option<String>,
    #[serde(default)]
    sector: String,
    #[serde(default)]
    nse_identifier: Option<String>,
}

/// The deduplicated set of instruments to analyze. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Universe {
    instruments: Vec<Instrument>,
}

impl Universe {
    /// Builds a universe from raw instruments, keeping the first occurrence
    /// of each symbol.
    pub fn from_instruments(instruments: Vec<Instrument>) -> Self {
        let mut seen: HashSet<Symbol> = HashSet::with_capacity(instruments.len());
        let instruments = instruments
            .into_iter()
            .filter(|instrument| seen.insert(instrument.symbol.clone()))
            .collect();
        Self { instruments }
    }

    /// Loads the universe from a CSV reference table.
    pub fn from_csv_path(path: &Path) -> Result<Self, UniverseError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut instruments = Vec::new();

        for row in reader.deserialize::<UniverseRow>() {
            let row = row?;
            let Some(raw_symbol) = row.symbol else {
                continue;
            };
            let symbol = match Symbol::parse(&raw_symbol) {
                Ok(symbol) => symbol,
                Err(error) => {
                    debug!(symbol = %raw_symbol, error = %error, "skipping universe row");
                    continue;
                }
            };
            let identifier = row
                .nse_identifier
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| format!("{symbol}EQN"));
            instruments.push(Instrument::new(symbol, row.sector, identifier));
        }

        Ok(Self::from_instruments(instruments))
    }

    /// Writes the universe back out as a CSV reference table.
    pub fn to_csv_path(&self, path: &Path) -> Result<(), UniverseError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["symbol", "sector", "nse_identifier"])?;
        for instrument in &self.instruments {
            writer.write_record([
                instrument.symbol.as_str(),
                instrument.sector.as_str(),
                instrument.identifier.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
