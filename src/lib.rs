//! # activity-bands
//!
//! Volatility bands and anomaly flagging for per-user web-log activity.
//!
//! A user's log records are counted into fixed-width time buckets, an
//! exponentially weighted mean ("midband") and standard deviation are run
//! over the counts, and buckets whose count falls outside
//! `midband ± k · volatility` are reported as anomalies.
//!
//! ```
//! use activity_bands::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let mut records = Vec::new();
//! for day in 0..30 {
//!     for hit in 0..(4 + day % 3) {
//!         let at = start + Duration::days(day) + Duration::minutes(hit);
//!         records.push(LogRecord::new(at, "/", 7, Some(1), "10.0.0.7"));
//!     }
//! }
//! let table = LogTable::new(records);
//!
//! let report = AnomalyDetector::new(DetectorConfig::new(10.0, 2.0))
//!     .detect(&table, 7)
//!     .unwrap();
//! assert_eq!(report.table.len(), 30);
//! ```

pub mod core;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod transform;

pub use error::{BandError, Result};

pub mod prelude {
    pub use crate::core::{extract, LogRecord, LogTable, TimeSeries};
    pub use crate::detection::{score, select_anomalies, AnomalySet, BandConfig, BandRow, BandTable};
    pub use crate::error::{BandError, Result};
    pub use crate::pipeline::{find_anomalies, AnomalyDetector, AnomalyReport, DetectorConfig};
    pub use crate::plot::{BandPlotter, TextPlotter};
    pub use crate::source::{JsonLinesSource, LogSource};
}
