//! Exponentially weighted volatility bands.
//!
//! The midband is the adjusted exponentially weighted mean of the bucket
//! counts and the volatility is the matching bias-corrected weighted standard
//! deviation. Bands sit `k` volatilities either side of the midband, and each
//! bucket gets a normalized position score
//!
//! `%b = (count - lower) / (upper - lower)`
//!
//! so 0 is the lower band, 0.5 the midband and 1 the upper band.

use crate::core::TimeSeries;
use crate::error::{BandError, Result};
use crate::transform::window::{ewm_mean, ewm_std, EwmConfig};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

/// Band parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandConfig {
    /// Effective look-back length in buckets, `alpha = 2 / (span + 1)`.
    pub span: f64,
    /// Band half-width in volatility units.
    pub k: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self { span: 30.0, k: 3.0 }
    }
}

impl BandConfig {
    pub fn new(span: f64, k: f64) -> Self {
        Self { span, k }
    }

    /// Check both parameters, returning the smoothing configuration.
    pub fn validate(&self) -> Result<EwmConfig> {
        if !self.span.is_finite() || self.span <= 0.0 {
            return Err(BandError::InvalidParameter(format!(
                "span must be positive, got {}",
                self.span
            )));
        }
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(BandError::InvalidParameter(format!(
                "k must be a finite value >= 0, got {}",
                self.k
            )));
        }
        EwmConfig::from_span(self.span)
    }
}

/// One scored bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandRow {
    /// Left edge of the bucket.
    pub timestamp: DateTime<Utc>,
    /// Number of events in the bucket.
    pub count: f64,
    pub midband: f64,
    /// `None` until enough history exists.
    pub volatility: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    /// Normalized position score, `None` when the band has no width.
    pub pct_b: Option<f64>,
    pub user_id: i64,
}

impl BandRow {
    /// Count above the upper band.
    pub fn is_above(&self) -> bool {
        self.pct_b.map_or(false, |b| b > 1.0)
    }

    /// Count below the lower band.
    pub fn is_below(&self) -> bool {
        self.pct_b.map_or(false, |b| b < 0.0)
    }
}

/// Scored buckets of one user, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable {
    pub user_id: i64,
    pub config: BandConfig,
    pub rows: Vec<BandRow>,
}

impl BandTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[BandRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BandRow> {
        self.rows.iter()
    }

    /// Rows whose score is defined.
    pub fn scored(&self) -> impl Iterator<Item = &BandRow> + '_ {
        self.rows.iter().filter(|r| r.pct_b.is_some())
    }
}

fn defined(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Score every bucket of `series` against its volatility bands.
///
/// # Example
/// ```
/// use activity_bands::core::TimeSeries;
/// use activity_bands::detection::{score, BandConfig};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..5).map(|i| base + Duration::days(i)).collect();
/// let series = TimeSeries::new(timestamps, vec![3.0, 4.0, 2.0, 5.0, 3.0]).unwrap();
///
/// let table = score(&series, &BandConfig::new(3.0, 2.0), 42).unwrap();
/// assert_eq!(table.len(), 5);
/// assert!(table.rows[0].pct_b.is_none());
/// ```
pub fn score(series: &TimeSeries, config: &BandConfig, user_id: i64) -> Result<BandTable> {
    let ewm = config.validate()?;
    let counts = series.values();

    let midband = ewm_mean(counts, &ewm);
    let volatility = ewm_std(counts, &ewm);

    let rows: Vec<BandRow> = series
        .timestamps()
        .iter()
        .zip(counts)
        .zip(midband.iter().zip(&volatility))
        .map(|((&timestamp, &count), (&mid, &vol))| {
            let vol = defined(vol);
            let upper = vol.map(|v| mid + config.k * v);
            let lower = vol.map(|v| mid - config.k * v);
            let pct_b = match (upper, lower) {
                (Some(ub), Some(lb)) if ub > lb => defined((count - lb) / (ub - lb)),
                _ => None,
            };

            BandRow {
                timestamp,
                count,
                midband: mid,
                volatility: vol,
                upper,
                lower,
                pct_b,
                user_id,
            }
        })
        .collect();

    debug!(
        "user {}: scored {} buckets (span {}, k {}), {} with a defined score",
        user_id,
        rows.len(),
        config.span,
        config.k,
        rows.iter().filter(|r| r.pct_b.is_some()).count()
    );

    Ok(BandTable {
        user_id,
        config: *config,
        rows,
    })
}
