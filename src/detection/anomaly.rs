//! Band-breach selection.

use crate::detection::bands::BandRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Buckets outside their volatility band.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalySet {
    /// Rows with `%b > 1`, chronological.
    pub above: Vec<BandRow>,
    /// Rows with `%b < 0`, chronological.
    pub below: Vec<BandRow>,
}

impl AnomalySet {
    /// Total number of anomalous buckets.
    pub fn len(&self) -> usize {
        self.above.len() + self.below.len()
    }

    pub fn is_empty(&self) -> bool {
        self.above.is_empty() && self.below.is_empty()
    }

    /// Check if the bucket starting at `timestamp` was flagged.
    pub fn is_anomalous(&self, timestamp: DateTime<Utc>) -> bool {
        self.above
            .iter()
            .chain(&self.below)
            .any(|r| r.timestamp == timestamp)
    }
}

/// Split scored rows into the above-band and below-band subsets.
///
/// Rows without a score belong to neither subset.
pub fn select_anomalies(rows: &[BandRow]) -> AnomalySet {
    let above = rows.iter().filter(|r| r.is_above()).copied().collect();
    let below = rows.iter().filter(|r| r.is_below()).copied().collect();
    AnomalySet { above, below }
}
