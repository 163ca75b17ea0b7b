//! End-to-end anomaly detection for one user.

use crate::core::{default_bucket_width, extract, LogTable};
use crate::detection::{score, select_anomalies, AnomalySet, BandConfig, BandTable};
use crate::error::Result;
use crate::plot::BandPlotter;
use chrono::Duration;
use log::{debug, warn};
use serde::Serialize;

/// Configuration for [`AnomalyDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Resampling granularity.
    pub bucket_width: Duration,
    pub bands: BandConfig,
    /// Hand the scored table to the plotter.
    pub plot: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            bucket_width: default_bucket_width(),
            bands: BandConfig::default(),
            plot: false,
        }
    }
}

impl DetectorConfig {
    pub fn new(span: f64, k: f64) -> Self {
        Self {
            bands: BandConfig::new(span, k),
            ..Default::default()
        }
    }

    pub fn with_bucket_width(mut self, width: Duration) -> Self {
        self.bucket_width = width;
        self
    }

    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }
}

/// Scored buckets of one user together with the flagged ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub table: BandTable,
    pub anomalies: AnomalySet,
}

/// Runs extraction, scoring, optional plotting and selection.
pub struct AnomalyDetector {
    config: DetectorConfig,
    plotter: Option<Box<dyn BandPlotter>>,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            plotter: None,
        }
    }

    /// Attach the sink used when `config.plot` is set.
    pub fn with_plotter(mut self, plotter: Box<dyn BandPlotter>) -> Self {
        self.plotter = Some(plotter);
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect band breaches in the activity of `user_id`.
    ///
    /// Parameters are checked before any work is done. A user without records
    /// gives an empty report.
    pub fn detect(&mut self, table: &LogTable, user_id: i64) -> Result<AnomalyReport> {
        self.config.bands.validate()?;

        let series = extract(table, user_id, self.config.bucket_width)?;
        let scored = score(&series, &self.config.bands, user_id)?;

        if self.config.plot {
            match self.plotter.as_mut() {
                Some(plotter) => plotter.plot(&scored)?,
                None => warn!("plot requested for user {} but no plotter is attached", user_id),
            }
        }

        let anomalies = select_anomalies(scored.rows());
        debug!(
            "user {}: {} above band, {} below band",
            user_id,
            anomalies.above.len(),
            anomalies.below.len()
        );

        Ok(AnomalyReport {
            table: scored,
            anomalies,
        })
    }
}

/// Detect anomalies with daily buckets and no plotting.
pub fn find_anomalies(table: &LogTable, user_id: i64, span: f64, k: f64) -> Result<AnomalySet> {
    AnomalyDetector::new(DetectorConfig::new(span, k))
        .detect(table, user_id)
        .map(|report| report.anomalies)
}
