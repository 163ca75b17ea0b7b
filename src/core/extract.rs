//! Per-user series extraction.

use crate::core::{LogTable, TimeSeries};
use crate::error::Result;
use crate::transform::resample::resample_count;
use chrono::{DateTime, Duration, Utc};
use log::debug;

/// Default bucket width: one day.
pub fn default_bucket_width() -> Duration {
    Duration::days(1)
}

/// Build the activity series of one user.
///
/// Selects the user's records, orders them by timestamp and counts records per
/// bucket of `bucket_width`, with zero-count buckets for gaps. The series spans
/// the bucket of the user's first record to that of their last one. A user
/// with no records yields an empty series.
///
/// # Example
/// ```
/// use activity_bands::core::{extract, LogRecord, LogTable};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let day = |d| Utc.with_ymd_and_hms(2024, 5, d, 10, 0, 0).unwrap();
/// let table = LogTable::new(vec![
///     LogRecord::new(day(1), "/", 7, None, "10.0.0.1"),
///     LogRecord::new(day(1), "/search", 7, None, "10.0.0.1"),
///     LogRecord::new(day(3), "/", 7, None, "10.0.0.1"),
///     LogRecord::new(day(2), "/", 8, None, "10.0.0.2"),
/// ]);
///
/// let series = extract(&table, 7, Duration::days(1)).unwrap();
/// assert_eq!(series.values(), &[2.0, 0.0, 1.0]);
/// ```
pub fn extract(table: &LogTable, user_id: i64, bucket_width: Duration) -> Result<TimeSeries> {
    let mut timestamps: Vec<DateTime<Utc>> =
        table.records_for_user(user_id).map(|r| r.date).collect();
    // Stable, so equal timestamps keep table order.
    timestamps.sort();

    let series = resample_count(&timestamps, bucket_width)?;
    debug!(
        "user {}: {} records into {} buckets of {}",
        user_id,
        timestamps.len(),
        series.len(),
        bucket_width
    );
    Ok(series)
}
