//! Band scoring and anomaly selection.
//!
//! This module provides tools for:
//! - Scoring buckets against exponentially weighted volatility bands
//! - Selecting buckets that breach those bands

mod anomaly;
mod bands;

pub use anomaly::{select_anomalies, AnomalySet};
pub use bands::{score, BandConfig, BandRow, BandTable};
