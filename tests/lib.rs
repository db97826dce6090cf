//! Shared helpers for sectorscope behavior tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use sectorscope_core::{
    ChartSeries, Instrument, MarketDataSource, SeriesPoint, SourceError, Symbol, UtcDateTime,
};

/// Deterministic market-data source scripted per chart identifier.
#[derive(Default)]
pub struct ScriptedSource {
    series: HashMap<String, ChartSeries>,
    failing: Vec<String>,
    constituents: Vec<Instrument>,
    prime_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, identifier: &str, series: ChartSeries) -> Self {
        self.series.insert(identifier.to_owned(), series);
        self
    }

    pub fn with_outage(mut self, identifier: &str) -> Self {
        self.failing.push(identifier.to_owned());
        self
    }

    pub fn with_constituents(mut self, constituents: Vec<Instrument>) -> Self {
        self.constituents = constituents;
        self
    }

    pub fn prime_calls(&self) -> usize {
        self.prime_calls.load(Ordering::SeqCst)
    }
}

impl MarketDataSource for ScriptedSource {
    fn prime<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.prime_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn chart<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> Pin<Box<dyn Future<Output = Result<ChartSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.failing.contains(&instrument.identifier) {
                return Err(SourceError::unavailable("scripted outage"));
            }
            Ok(self
                .series
                .get(&instrument.identifier)
                .cloned()
                .unwrap_or_else(ChartSeries::empty))
        })
    }

    fn index_constituents<'a>(
        &'a self,
        _index: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Instrument>, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.constituents.clone()) })
    }
}

pub fn ts(value: &str) -> UtcDateTime {
    UtcDateTime::parse(value).expect("test timestamp must parse")
}

pub fn series(points: &[(&str, f64)]) -> ChartSeries {
    ChartSeries::new(
        points
            .iter()
            .map(|(when, value)| SeriesPoint::new(ts(when), *value))
            .collect(),
    )
}

pub fn instrument(symbol: &str, sector: &str) -> Instrument {
    Instrument::with_default_identifier(
        Symbol::parse(symbol).expect("test symbol must parse"),
        sector,
    )
}
