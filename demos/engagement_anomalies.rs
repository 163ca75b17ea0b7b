//! Engagement anomaly example.
//!
//! Run with: cargo run --example engagement_anomalies

use activity_bands::prelude::*;
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<()> {
    println!("=== Engagement Anomaly Example ===\n");

    // A learner who reads a handful of pages on weekdays, goes quiet on
    // weekends, crams once before an assessment and disappears for a week.
    let start = Utc.with_ymd_and_hms(2021, 3, 1, 9, 0, 0).unwrap();
    let mut records = Vec::new();
    for day in 0..70i64 {
        let hits = match day {
            41 => 55,
            55..=61 => 0,
            d if d % 7 >= 5 => 1,
            d => 6 + d % 3,
        };
        for hit in 0..hits {
            let at = start + Duration::days(day) + Duration::minutes(hit * 11);
            records.push(LogRecord::new(at, format!("/lesson/{}", hit), 53, Some(22), "10.0.0.53"));
        }
    }
    let table = LogTable::new(records);
    println!("Generated {} log records\n", table.len());

    let config = DetectorConfig::new(14.0, 2.0).with_plot(true);
    let mut detector =
        AnomalyDetector::new(config).with_plotter(Box::new(TextPlotter::new(std::io::stdout())));
    let report = detector.detect(&table, 53)?;

    println!("\nAbove band:");
    for row in &report.anomalies.above {
        println!(
            "  {}  {} pages (midband {:.1}, %b {:.2})",
            row.timestamp.format("%Y-%m-%d"),
            row.count,
            row.midband,
            row.pct_b.unwrap_or(f64::NAN)
        );
    }

    println!("\nBelow band:");
    for row in &report.anomalies.below {
        println!(
            "  {}  {} pages (midband {:.1}, %b {:.2})",
            row.timestamp.format("%Y-%m-%d"),
            row.count,
            row.midband,
            row.pct_b.unwrap_or(f64::NAN)
        );
    }

    Ok(())
}
