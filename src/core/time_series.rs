//! TimeSeries data structure for bucketed activity counts.

use crate::error::{BandError, Result};
use crate::transform::resample::{resample_values, Aggregation};
use chrono::{DateTime, Duration, Utc};

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Duration>,
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::empty()
    }
}

impl TimeSeries {
    /// Create a new series, validating ordering and lengths.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(BandError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if values.len() != timestamps.len() {
            return Err(BandError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        Ok(Self {
            timestamps,
            values,
            frequency: None,
        })
    }

    /// A series with no observations.
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
            frequency: None,
        }
    }

    /// Attach a regular bucket width.
    pub fn with_frequency(mut self, freq: Duration) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    /// Sum of all finite values.
    pub fn total(&self) -> f64 {
        self.values.iter().filter(|v| v.is_finite()).sum()
    }

    /// Iterate over `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Extract the observations in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(BandError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(BandError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            frequency: self.frequency,
        })
    }

    /// Re-bucket the series at a new width.
    ///
    /// Buckets are anchored at midnight of the first observation's day, so
    /// daily buckets start at 00:00 and sub-daily widths that divide a day nest
    /// inside them.
    pub fn resample(&self, width: Duration, how: Aggregation) -> Result<TimeSeries> {
        resample_values(&self.timestamps, &self.values, width, how)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn make_daily_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn time_series_constructs_univariate_data() {
        let ts = TimeSeries::new(make_daily_timestamps(4), vec![1.0, 0.0, 3.0, 2.0]).unwrap();

        assert_eq!(ts.len(), 4);
        assert!(!ts.is_empty());
        assert_eq!(ts.values(), &[1.0, 0.0, 3.0, 2.0]);
        assert!(ts.frequency().is_none());
        assert_relative_eq!(ts.total(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn time_series_rejects_non_increasing_timestamps() {
        let mut timestamps = make_daily_timestamps(3);
        timestamps[2] = timestamps[1];

        let err = TimeSeries::new(timestamps, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, BandError::TimestampError(_)));
    }

    #[test]
    fn time_series_rejects_length_mismatch() {
        let err = TimeSeries::new(make_daily_timestamps(3), vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            BandError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn time_series_slice_keeps_frequency() {
        let ts = TimeSeries::new(make_daily_timestamps(5), vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
            .with_frequency(Duration::days(1));

        let part = ts.slice(1, 3).unwrap();
        assert_eq!(part.values(), &[2.0, 3.0]);
        assert_eq!(part.frequency(), Some(Duration::days(1)));

        assert!(matches!(
            ts.slice(3, 1),
            Err(BandError::InvalidParameter(_))
        ));
        assert_eq!(
            ts.slice(0, 9).unwrap_err(),
            BandError::IndexOutOfBounds { index: 9, size: 5 }
        );
    }

    #[test]
    fn time_series_iterates_pairs_in_order() {
        let stamps = make_daily_timestamps(2);
        let ts = TimeSeries::new(stamps.clone(), vec![7.0, 9.0]).unwrap();

        let pairs: Vec<_> = ts.iter().collect();
        assert_eq!(pairs, vec![(stamps[0], 7.0), (stamps[1], 9.0)]);
    }

    #[test]
    fn empty_series_has_zero_total() {
        let ts = TimeSeries::empty();
        assert!(ts.is_empty());
        assert_eq!(ts.total(), 0.0);
    }
}
