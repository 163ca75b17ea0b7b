//! Core data structures: raw log records and bucketed activity series.

mod extract;
mod record;
mod time_series;

pub use extract::{default_bucket_width, extract};
pub use record::{parse_timestamp, LogRecord, LogTable};
pub use time_series::TimeSeries;
