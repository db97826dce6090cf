//! Fan-out fetch/extract pipeline and run assembly.
//!
//! Each instrument is fetched and snapshotted by an independent worker task;
//! workers share one [`RequestPacer`] so the upstream sees a global request
//! budget. All tagged outcomes are gathered before aggregation starts, and
//! the assembled report lists results in universe order.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::aggregate::{ChangeAggregator, InstrumentOutcome, DEFAULT_RANK_DEPTH};
use crate::data_source::{MarketDataSource, SourceError};
use crate::domain::{
    ChangeRecord, ChartSeries, FailureRecord, SectorAggregate, TradingWindow, UtcDateTime,
};
use crate::extract::{SnapshotExtractor, DEFAULT_TOLERANCE};
use crate::throttling::{RequestPacer, DEFAULT_QUOTA_LIMIT, DEFAULT_QUOTA_WINDOW};
use crate::universe::Universe;
use crate::ValidationError;

/// Tunables for one analysis run. Defaults mirror the analyst workflow:
/// 120 s tolerance, three sectors per ranking side, a small worker pool and a
/// polite shared request budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Maximum accepted distance between a target and its nearest sample.
    pub tolerance: time::Duration,
    /// Sectors reported on each side of the ranking.
    pub rank_depth: usize,
    /// Concurrent fetch workers.
    pub concurrency: usize,
    /// Pacing window shared by all workers.
    pub quota_window: std::time::Duration,
    /// Requests allowed per pacing window.
    pub quota_limit: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            rank_depth: DEFAULT_RANK_DEPTH,
            concurrency: 8,
            quota_window: DEFAULT_QUOTA_WINDOW,
            quota_limit: DEFAULT_QUOTA_LIMIT,
        }
    }
}

/// Everything a run produces: per-instrument change records in universe
/// order, the full descending sector ranking with its gainer/loser slices,
/// and one failure record per instrument that yielded no change.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnalysisReport {
    pub date: String,
    pub open_target: UtcDateTime,
    pub close_target: UtcDateTime,
    pub changes: Vec<ChangeRecord>,
    pub sectors: Vec<SectorAggregate>,
    pub gainers: Vec<SectorAggregate>,
    pub losers: Vec<SectorAggregate>,
    pub failures: Vec<FailureRecord>,
}

impl AnalysisReport {
    pub fn has_results(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Drives one analysis run against a market-data source.
pub struct AnalysisRunner {
    source: Arc<dyn MarketDataSource>,
    pacer: RequestPacer,
    extractor: SnapshotExtractor,
    aggregator: ChangeAggregator,
    concurrency: usize,
}

impl AnalysisRunner {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        config: &AnalysisConfig,
    ) -> Result<Self, ValidationError> {
        if config.concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(Self {
            source,
            pacer: RequestPacer::new(config.quota_window, config.quota_limit),
            extractor: SnapshotExtractor::new(config.tolerance)?,
            aggregator: ChangeAggregator::new(config.rank_depth)?,
            concurrency: config.concurrency,
        })
    }

    /// Runs the full pipeline: prime the session, fan out one fetch/extract
    /// task per instrument, gather every outcome, then aggregate and rank.
    pub async fn run(
        &self,
        universe: &Universe,
        window: &TradingWindow,
    ) -> Result<AnalysisReport, SourceError> {
        self.source.prime().await?;

        let open_target = window.open_instant();
        let close_target = window.close_instant();

        let mut outcomes: Vec<Option<InstrumentOutcome>> = vec![None; universe.len()];
        let mut tasks: JoinSet<(usize, InstrumentOutcome)> = JoinSet::new();

        for (index, instrument) in universe.instruments().iter().cloned().enumerate() {
            while tasks.len() >= self.concurrency {
                match tasks.join_next().await {
                    Some(Ok((slot, outcome))) => outcomes[slot] = Some(outcome),
                    Some(Err(error)) => warn!(error = %error, "fetch worker aborted"),
                    None => break,
                }
            }

            let source = Arc::clone(&self.source);
            let pacer = self.pacer.clone();
            let extractor = self.extractor;
            let aggregator = self.aggregator;
            tasks.spawn(async move {
                pacer.throttle().await;

                let (series, fetch_detail) = match source.chart(&instrument).await {
                    Ok(series) => (series, None),
                    Err(error) => {
                        // Series unavailable: same as an empty series, the
                        // instrument becomes a failure record below.
                        warn!(symbol = %instrument.symbol, error = %error, "chart fetch failed");
                        (ChartSeries::empty(), Some(error.to_string()))
                    }
                };

                let open = extractor.extract_at(&series, open_target);
                let close = extractor.extract_at(&series, close_target);

                let mut outcome = aggregator.outcome_for(&instrument, open, close);
                if let InstrumentOutcome::Failure(failure) = &mut outcome {
                    failure.detail = fetch_detail;
                }
                (index, outcome)
            });
        }

        // Gather barrier: aggregation only starts once every worker reported.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => outcomes[slot] = Some(outcome),
                Err(error) => warn!(error = %error, "fetch worker aborted"),
            }
        }

        let mut changes = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                InstrumentOutcome::Change(record) => changes.push(record),
                InstrumentOutcome::Failure(record) => failures.push(record),
            }
        }

        let sectors = self.aggregator.rank_sectors(&changes);
        let gainers = self.aggregator.gainers(&sectors).to_vec();
        let losers = self.aggregator.losers(&sectors).to_vec();

        info!(
            instruments = universe.len(),
            successes = changes.len(),
            failures = failures.len(),
            sectors = sectors.len(),
            "analysis run complete"
        );

        Ok(AnalysisReport {
            date: window.date_tag(),
            open_target,
            close_target,
            changes,
            sectors,
            gainers,
            losers,
            failures,
        })
    }
}
