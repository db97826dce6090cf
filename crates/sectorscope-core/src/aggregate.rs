//! Percentage-change computation and sector ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{
    ChangeRecord, FailureReason, FailureRecord, Instrument, SectorAggregate, Snapshot,
};
use crate::ValidationError;

/// Number of sectors reported on each side of the ranking by default.
pub const DEFAULT_RANK_DEPTH: usize = 3;

/// Tagged per-instrument result. Every instrument resolves to exactly one of
/// these.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentOutcome {
    Change(ChangeRecord),
    Failure(FailureRecord),
}

/// Turns per-instrument snapshot pairs into change records and ranks sector
/// means. Stateless; both steps are pure transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAggregator {
    rank_depth: usize,
}

impl Default for ChangeAggregator {
    fn default() -> Self {
        Self {
            rank_depth: DEFAULT_RANK_DEPTH,
        }
    }
}

impl ChangeAggregator {
    pub fn new(rank_depth: usize) -> Result<Self, ValidationError> {
        if rank_depth == 0 {
            return Err(ValidationError::InvalidRankDepth);
        }
        Ok(Self { rank_depth })
    }

    pub const fn rank_depth(&self) -> usize {
        self.rank_depth
    }

    /// Resolves one instrument's open/close snapshots into its outcome.
    ///
    /// A missing snapshot on either side short-circuits to `missing_prices`.
    /// An open value of zero (or anything else that leaves the percentage
    /// undefined) is reported as `invalid_open_price` instead of dividing.
    pub fn outcome_for(
        &self,
        instrument: &Instrument,
        open: Option<Snapshot>,
        close: Option<Snapshot>,
    ) -> InstrumentOutcome {
        let (Some(open), Some(close)) = (open, close) else {
            return InstrumentOutcome::Failure(FailureRecord {
                symbol: instrument.symbol.clone(),
                identifier: instrument.identifier.clone(),
                reason: FailureReason::MissingPrices,
                detail: None,
            });
        };

        if !open.value.is_finite() || open.value <= 0.0 {
            return InstrumentOutcome::Failure(FailureRecord {
                symbol: instrument.symbol.clone(),
                identifier: instrument.identifier.clone(),
                reason: FailureReason::InvalidOpenPrice,
                detail: None,
            });
        }

        let pct_change = (close.value - open.value) / open.value * 100.0;
        InstrumentOutcome::Change(ChangeRecord {
            symbol: instrument.symbol.clone(),
            sector: instrument.sector.clone(),
            open_value: open.value,
            close_value: close.value,
            pct_change,
        })
    }

    /// Groups change records by exact sector label, excluding empty sectors,
    /// and returns per-sector means sorted by mean descending. Sectors with
    /// equal means keep alphabetical order.
    pub fn rank_sectors(&self, records: &[ChangeRecord]) -> Vec<SectorAggregate> {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for record in records {
            if record.sector.trim().is_empty() {
                continue;
            }
            let entry = sums.entry(record.sector.as_str()).or_insert((0.0, 0));
            entry.0 += record.pct_change;
            entry.1 += 1;
        }

        let mut aggregates: Vec<SectorAggregate> = sums
            .into_iter()
            .map(|(sector, (total, records))| SectorAggregate {
                sector: sector.to_owned(),
                avg_pct_change: total / records as f64,
                records,
            })
            .collect();

        aggregates.sort_by(|a, b| {
            b.avg_pct_change
                .partial_cmp(&a.avg_pct_change)
                .unwrap_or(Ordering::Equal)
        });
        aggregates
    }

    /// Leading slice of the descending ranking.
    pub fn gainers<'a>(&self, ranked: &'a [SectorAggregate]) -> &'a [SectorAggregate] {
        &ranked[..self.rank_depth.min(ranked.len())]
    }

    /// Trailing slice of the descending ranking, still in descending order.
    /// With fewer than `2 * rank_depth` sectors the two slices overlap; that
    /// is accepted behavior, not an error.
    pub fn losers<'a>(&self, ranked: &'a [SectorAggregate]) -> &'a [SectorAggregate] {
        &ranked[ranked.len().saturating_sub(self.rank_depth)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Symbol;
    use time::Duration;

    fn instrument(symbol: &str, sector: &str) -> Instrument {
        Instrument::with_default_identifier(
            Symbol::parse(symbol).expect("test symbol must parse"),
            sector,
        )
    }

    fn snap(value: f64) -> Option<Snapshot> {
        Some(Snapshot {
            value,
            distance: Duration::seconds(10),
        })
    }

    fn change(sector: &str, pct_change: f64) -> ChangeRecord {
        ChangeRecord {
            symbol: Symbol::parse("TEST").expect("test symbol must parse"),
            sector: sector.to_owned(),
            open_value: 100.0,
            close_value: 100.0 + pct_change,
            pct_change,
        }
    }

    #[test]
    fn computes_exact_percentage_change() {
        let aggregator = ChangeAggregator::default();
        let reliance = instrument("RELIANCE", "Energy");

        let up = aggregator.outcome_for(&reliance, snap(100.0), snap(110.0));
        let InstrumentOutcome::Change(record) = up else {
            panic!("expected change record");
        };
        assert_eq!(record.pct_change, 10.0);

        let down = aggregator.outcome_for(&reliance, snap(100.0), snap(90.0));
        let InstrumentOutcome::Change(record) = down else {
            panic!("expected change record");
        };
        assert_eq!(record.pct_change, -10.0);
    }

    #[test]
    fn missing_snapshot_on_either_side_fails_with_missing_prices() {
        let aggregator = ChangeAggregator::default();
        let infy = instrument("INFY", "IT");

        for (open, close) in [(None, snap(100.0)), (snap(100.0), None), (None, None)] {
            let outcome = aggregator.outcome_for(&infy, open, close);
            let InstrumentOutcome::Failure(failure) = outcome else {
                panic!("expected failure record");
            };
            assert_eq!(failure.reason, FailureReason::MissingPrices);
            assert_eq!(failure.symbol.as_str(), "INFY");
            assert_eq!(failure.identifier, "INFYEQN");
        }
    }

    #[test]
    fn zero_open_price_never_divides() {
        let aggregator = ChangeAggregator::default();
        let outcome = aggregator.outcome_for(&instrument("TCS", "IT"), snap(0.0), snap(105.0));

        let InstrumentOutcome::Failure(failure) = outcome else {
            panic!("expected failure record");
        };
        assert_eq!(failure.reason, FailureReason::InvalidOpenPrice);
    }

    #[test]
    fn negative_open_price_is_invalid() {
        let aggregator = ChangeAggregator::default();
        let outcome = aggregator.outcome_for(&instrument("TCS", "IT"), snap(-1.0), snap(105.0));

        assert!(matches!(
            outcome,
            InstrumentOutcome::Failure(FailureRecord {
                reason: FailureReason::InvalidOpenPrice,
                ..
            })
        ));
    }

    #[test]
    fn sector_means_group_by_exact_label() {
        let aggregator = ChangeAggregator::default();
        let records = vec![
            change("Banking", 10.0),
            change("Banking", 20.0),
            change("Pharma", -5.0),
        ];

        let ranked = aggregator.rank_sectors(&records);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].sector, "Banking");
        assert_eq!(ranked[0].avg_pct_change, 15.0);
        assert_eq!(ranked[0].records, 2);
        assert_eq!(ranked[1].sector, "Pharma");
        assert_eq!(ranked[1].avg_pct_change, -5.0);
    }

    #[test]
    fn empty_sector_records_are_excluded() {
        let aggregator = ChangeAggregator::default();
        let records = vec![change("", 40.0), change("   ", 40.0), change("Autos", 2.0)];

        let ranked = aggregator.rank_sectors(&records);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].sector, "Autos");
    }

    #[test]
    fn ranking_overlaps_below_six_sectors() {
        let aggregator = ChangeAggregator::default();
        let records = vec![
            change("A", 30.0),
            change("B", 20.0),
            change("C", 10.0),
            change("D", 0.0),
            change("E", -10.0),
        ];

        let ranked = aggregator.rank_sectors(&records);
        let gainer_means: Vec<f64> = aggregator
            .gainers(&ranked)
            .iter()
            .map(|s| s.avg_pct_change)
            .collect();
        let loser_means: Vec<f64> = aggregator
            .losers(&ranked)
            .iter()
            .map(|s| s.avg_pct_change)
            .collect();

        assert_eq!(gainer_means, vec![30.0, 20.0, 10.0]);
        // Five sectors: the 10.0 entry shows up on both sides.
        assert_eq!(loser_means, vec![10.0, 0.0, -10.0]);
    }

    #[test]
    fn ranking_handles_fewer_sectors_than_depth() {
        let aggregator = ChangeAggregator::default();
        let ranked = aggregator.rank_sectors(&[change("Solo", 1.0)]);

        assert_eq!(aggregator.gainers(&ranked).len(), 1);
        assert_eq!(aggregator.losers(&ranked).len(), 1);
    }

    #[test]
    fn rejects_zero_rank_depth() {
        let err = ChangeAggregator::new(0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidRankDepth));
    }
}
