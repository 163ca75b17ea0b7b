//! Data transformations for time series.
//!
//! Provides fixed-width resampling and exponentially weighted window functions.
//!
//! # Example
//!
//! ```
//! use activity_bands::transform::{ewm_mean, ewm_std, EwmConfig};
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! let config = EwmConfig::from_span(3.0).unwrap();
//!
//! let midband = ewm_mean(&series, &config);
//! let volatility = ewm_std(&series, &config);
//! assert!(volatility[0].is_nan());
//! assert_eq!(midband.len(), 5);
//! ```

pub mod resample;
pub mod window;

pub use resample::{
    bucket_origin, parse_frequency, resample_count, resample_values, Aggregation, MAX_BUCKETS,
};
pub use window::{ewm_mean, ewm_std, ewm_var, Decay, EwmConfig};
