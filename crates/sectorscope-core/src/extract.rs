//! Nearest-sample extraction over intraday chart series.

use time::Duration;

use crate::domain::{ChartSeries, Snapshot, UtcDateTime};
use crate::ValidationError;

/// Default maximum accepted distance between a target instant and the nearest
/// available sample.
pub const DEFAULT_TOLERANCE: Duration = Duration::seconds(120);

/// Nearest-timestamp lookup with a maximum accepted distance.
///
/// Pure with respect to its inputs: the same series and target always produce
/// the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotExtractor {
    tolerance: Duration,
}

impl Default for SnapshotExtractor {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SnapshotExtractor {
    pub fn new(tolerance: Duration) -> Result<Self, ValidationError> {
        if tolerance <= Duration::ZERO {
            return Err(ValidationError::InvalidTolerance);
        }
        Ok(Self { tolerance })
    }

    pub const fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Returns the sample closest in absolute time to `target`, provided its
    /// distance does not exceed the tolerance.
    ///
    /// The series may be unsorted and may repeat timestamps. On exactly tied
    /// distances the first point encountered wins; callers must not rely on a
    /// particular winner unless the input order is canonical.
    pub fn extract_at(&self, series: &ChartSeries, target: UtcDateTime) -> Option<Snapshot> {
        let mut best: Option<Snapshot> = None;

        for point in &series.points {
            let distance = point.ts.distance(target);
            let closer = match &best {
                Some(current) => distance < current.distance,
                None => true,
            };
            if closer {
                best = Some(Snapshot {
                    value: point.value,
                    distance,
                });
            }
        }

        best.filter(|snapshot| snapshot.distance <= self.tolerance)
    }
}
