//! Fixed-width time bucketing.
//!
//! Buckets are labelled by their left edge and anchored at midnight (UTC) of
//! the first observation's day. Every bucket between the first and the last
//! observation is emitted, so gaps show up as empty buckets.

use crate::core::TimeSeries;
use crate::error::{BandError, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Upper bound on the number of buckets a single resample may produce.
pub const MAX_BUCKETS: usize = 10_000_000;

/// How observations falling in the same bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Sum of values; empty buckets are 0.
    #[default]
    Sum,
    /// Number of non-missing values; empty buckets are 0.
    Count,
    /// Mean of values; empty buckets are NaN.
    Mean,
    /// Maximum value; empty buckets are NaN.
    Max,
    /// Minimum value; empty buckets are NaN.
    Min,
}

/// Parse a frequency alias such as `"d"`, `"6h"`, `"15min"` or `"2W"`.
///
/// Supported units: `s`/`S` (seconds), `min`/`T` (minutes), `h`/`H` (hours),
/// `d`/`D` (days) and `w`/`W` (weeks of seven days). A missing multiple means 1.
pub fn parse_frequency(alias: &str) -> Result<Duration> {
    let alias = alias.trim();
    let split = alias
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(alias.len());
    let (digits, unit) = alias.split_at(split);

    let multiple: i64 = if digits.is_empty() {
        1
    } else {
        digits.parse().map_err(|_| {
            BandError::InvalidParameter(format!("invalid frequency multiple in '{}'", alias))
        })?
    };

    if multiple <= 0 {
        return Err(BandError::InvalidParameter(format!(
            "frequency multiple must be positive, got '{}'",
            alias
        )));
    }

    let unit_width = match unit {
        "s" | "S" => Duration::seconds(1),
        "min" | "T" => Duration::minutes(1),
        "h" | "H" => Duration::hours(1),
        "d" | "D" => Duration::days(1),
        "w" | "W" => Duration::weeks(1),
        _ => {
            return Err(BandError::InvalidParameter(format!(
                "unknown frequency alias '{}'",
                alias
            )))
        }
    };

    i32::try_from(multiple)
        .ok()
        .and_then(|m| unit_width.checked_mul(m))
        .ok_or_else(|| BandError::InvalidParameter(format!("frequency '{}' is too large", alias)))
}

/// Midnight of the day containing `first`.
pub fn bucket_origin(first: DateTime<Utc>) -> DateTime<Utc> {
    first
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Count timestamps per bucket of `width`, filling gaps with zero.
///
/// The input does not need to be sorted. An empty input gives an empty series.
pub fn resample_count(timestamps: &[DateTime<Utc>], width: Duration) -> Result<TimeSeries> {
    let ones = vec![1.0; timestamps.len()];
    resample_values(timestamps, &ones, width, Aggregation::Count)
}

/// Aggregate `values` observed at `timestamps` into buckets of `width`.
pub fn resample_values(
    timestamps: &[DateTime<Utc>],
    values: &[f64],
    width: Duration,
    how: Aggregation,
) -> Result<TimeSeries> {
    if values.len() != timestamps.len() {
        return Err(BandError::DimensionMismatch {
            expected: timestamps.len(),
            got: values.len(),
        });
    }

    let width_ns = width
        .num_nanoseconds()
        .filter(|&ns| ns > 0)
        .ok_or_else(|| {
            BandError::InvalidParameter(format!("bucket width must be positive, got {}", width))
        })?;

    let (first, last) = match (timestamps.iter().min(), timestamps.iter().max()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(TimeSeries::empty().with_frequency(width)),
    };

    let origin = bucket_origin(first);
    let bucket_of = |t: DateTime<Utc>| -> Result<i64> {
        (t - origin)
            .num_nanoseconds()
            .map(|offset| offset / width_ns)
            .ok_or_else(|| BandError::TimestampError("timestamp span is too wide".to_string()))
    };

    let first_bucket = bucket_of(first)?;
    let n = (bucket_of(last)? - first_bucket + 1) as usize;
    if n > MAX_BUCKETS {
        return Err(BandError::InvalidParameter(format!(
            "bucket width {} would produce {} buckets (limit {})",
            width, n, MAX_BUCKETS
        )));
    }

    let mut sums = vec![0.0; n];
    let mut counts = vec![0usize; n];
    let mut maxima = vec![f64::NAN; n];
    let mut minima = vec![f64::NAN; n];

    for (&t, &v) in timestamps.iter().zip(values) {
        let idx = (bucket_of(t)? - first_bucket) as usize;
        if v.is_nan() {
            continue;
        }
        sums[idx] += v;
        counts[idx] += 1;
        maxima[idx] = if maxima[idx].is_nan() { v } else { maxima[idx].max(v) };
        minima[idx] = if minima[idx].is_nan() { v } else { minima[idx].min(v) };
    }

    let aggregated: Vec<f64> = match how {
        Aggregation::Sum => sums,
        Aggregation::Count => counts.iter().map(|&c| c as f64).collect(),
        Aggregation::Mean => sums
            .iter()
            .zip(&counts)
            .map(|(&s, &c)| if c == 0 { f64::NAN } else { s / c as f64 })
            .collect(),
        Aggregation::Max => maxima,
        Aggregation::Min => minima,
    };

    let bucket_timestamps: Vec<DateTime<Utc>> = (0..n as i64)
        .map(|i| origin + Duration::nanoseconds((first_bucket + i) * width_ns))
        .collect();

    Ok(TimeSeries::new(bucket_timestamps, aggregated)?.with_frequency(width))
}
