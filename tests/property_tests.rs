//! Property-based tests for band scoring and bucketing.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated activity counts and log timestamps.

use activity_bands::core::{extract, LogRecord, LogTable, TimeSeries};
use activity_bands::detection::{score, select_anomalies, BandConfig};
use activity_bands::transform::{resample_count, Aggregation};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

/// Create a daily TimeSeries from a vector of counts.
fn make_ts(values: &[f64]) -> TimeSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..values.len())
        .map(|i| base + Duration::days(i as i64))
        .collect();
    TimeSeries::new(timestamps, values.to_vec()).unwrap()
}

/// Strategy for non-negative integer bucket counts.
fn counts_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u32..200, min_len..max_len)
        .prop_map(|v| v.into_iter().map(f64::from).collect())
}

/// Strategy for log timestamps scattered over roughly three weeks.
fn timestamps_strategy(max_len: usize) -> impl Strategy<Value = Vec<DateTime<Utc>>> {
    let base = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
    prop::collection::vec(0i64..(21 * 24 * 60 * 60), 1..max_len)
        .prop_map(move |offsets| {
            offsets
                .into_iter()
                .map(|s| base + Duration::seconds(s))
                .collect()
        })
}

fn band_strategy() -> impl Strategy<Value = BandConfig> {
    (1.0..60.0_f64, 0.0..5.0_f64).prop_map(|(span, k)| BandConfig::new(span, k))
}

// =============================================================================
// Property: upper >= midband >= lower wherever volatility is defined
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn bands_bracket_the_midband(
        values in counts_strategy(1, 120),
        config in band_strategy()
    ) {
        let table = score(&make_ts(&values), &config, 1).unwrap();
        for row in table.iter() {
            if row.volatility.is_some() {
                let ub = row.upper.unwrap();
                let lb = row.lower.unwrap();
                prop_assert!(ub >= row.midband);
                prop_assert!(row.midband >= lb);
            } else {
                prop_assert!(row.upper.is_none() && row.lower.is_none());
                prop_assert!(row.pct_b.is_none());
            }
        }
    }

    #[test]
    fn scored_rows_match_series_length(
        values in counts_strategy(0, 120),
        config in band_strategy()
    ) {
        let series = make_ts(&values);
        let table = score(&series, &config, 3).unwrap();
        prop_assert_eq!(table.len(), series.len());
    }

    #[test]
    fn volatility_is_undefined_only_at_the_start(
        values in counts_strategy(2, 80),
        span in 1.5..40.0_f64
    ) {
        let table = score(&make_ts(&values), &BandConfig::new(span, 2.0), 1).unwrap();
        prop_assert!(table.rows[0].volatility.is_none());
        for row in &table.rows[1..] {
            prop_assert!(row.volatility.is_some());
        }
    }
}

// =============================================================================
// Property: anomaly subsets are disjoint and chronological
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn anomaly_subsets_are_disjoint(
        values in counts_strategy(1, 120),
        config in band_strategy()
    ) {
        let table = score(&make_ts(&values), &config, 1).unwrap();
        let set = select_anomalies(table.rows());

        prop_assert!(set.above.len() + set.below.len() <= table.len());
        for row in &set.above {
            prop_assert!(!set.below.iter().any(|b| b.timestamp == row.timestamp));
            prop_assert!(row.pct_b.unwrap() > 1.0);
        }
        for row in &set.below {
            prop_assert!(row.pct_b.unwrap() < 0.0);
        }
        prop_assert!(set.above.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        prop_assert!(set.below.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn zero_k_flags_nothing(values in counts_strategy(1, 80), span in 1.0..30.0_f64) {
        let table = score(&make_ts(&values), &BandConfig::new(span, 0.0), 1).unwrap();
        prop_assert!(table.iter().all(|r| r.pct_b.is_none()));
        prop_assert!(select_anomalies(table.rows()).is_empty());
    }
}

// =============================================================================
// Property: scoring is deterministic
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn scoring_twice_is_identical(
        values in counts_strategy(1, 100),
        config in band_strategy()
    ) {
        let series = make_ts(&values);
        let a = score(&series, &config, 1).unwrap();
        let b = score(&series, &config, 1).unwrap();
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Property: bucketing never loses events
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn rebucketing_preserves_event_total(stamps in timestamps_strategy(300)) {
        let n = stamps.len() as f64;

        let fine = resample_count(&stamps, Duration::hours(1)).unwrap();
        let coarse = fine.resample(Duration::days(1), Aggregation::Sum).unwrap();
        let fine_again = coarse.resample(Duration::hours(1), Aggregation::Sum).unwrap();

        prop_assert_eq!(fine.total(), n);
        prop_assert_eq!(coarse.total(), n);
        prop_assert_eq!(fine_again.total(), n);

        let direct = resample_count(&stamps, Duration::days(1)).unwrap();
        prop_assert_eq!(direct.values(), coarse.values());
    }

    #[test]
    fn extracted_series_counts_every_user_record(
        stamps in timestamps_strategy(200),
        other in timestamps_strategy(50)
    ) {
        let mut records: Vec<LogRecord> = stamps
            .iter()
            .map(|&t| LogRecord::new(t, "/", 1, None, "10.0.0.1"))
            .collect();
        records.extend(other.iter().map(|&t| LogRecord::new(t, "/", 2, None, "10.0.0.2")));
        let table = LogTable::new(records);

        let series = extract(&table, 1, Duration::days(1)).unwrap();
        prop_assert_eq!(series.total(), stamps.len() as f64);
        prop_assert!(series.timestamps().windows(2).all(|w| w[0] < w[1]));

        let first = *stamps.iter().min().unwrap();
        let last = *stamps.iter().max().unwrap();
        prop_assert!(series.timestamps()[0] <= first);
        prop_assert!(*series.timestamps().last().unwrap() <= last);
        prop_assert!(*series.timestamps().last().unwrap() + Duration::days(1) > last);
    }
}
