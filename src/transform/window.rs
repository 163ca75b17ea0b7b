//! Exponentially weighted window functions.
//!
//! With `adjust = true` the value observed `i` steps back carries weight
//! `(1 - alpha)^i` and every output is a normalized weighted average over the
//! full history. With `adjust = false` the classic recursion
//! `ewm_t = alpha * x_t + (1 - alpha) * ewm_{t-1}` is used instead.
//!
//! NaN inputs are missing observations. Outputs use NaN for positions where
//! the statistic is undefined.

use crate::error::{BandError, Result};

/// Parameterization of the exponential decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decay {
    /// Effective window length; `alpha = 2 / (span + 1)`, requires `span >= 1`.
    Span(f64),
    /// Center of mass; `alpha = 1 / (1 + com)`, requires `com >= 0`.
    CenterOfMass(f64),
    /// Half-life in observations; `alpha = 1 - exp(-ln 2 / halflife)`.
    HalfLife(f64),
    /// Smoothing factor directly, `0 < alpha <= 1`.
    Alpha(f64),
}

impl Decay {
    /// Resolve to a smoothing factor in `(0, 1]`.
    pub fn alpha(&self) -> Result<f64> {
        match *self {
            Decay::Span(span) => {
                if !span.is_finite() || span < 1.0 {
                    return Err(BandError::InvalidParameter(format!(
                        "span must be a finite value >= 1, got {}",
                        span
                    )));
                }
                Ok(2.0 / (span + 1.0))
            }
            Decay::CenterOfMass(com) => {
                if !com.is_finite() || com < 0.0 {
                    return Err(BandError::InvalidParameter(format!(
                        "center of mass must be a finite value >= 0, got {}",
                        com
                    )));
                }
                Ok(1.0 / (1.0 + com))
            }
            Decay::HalfLife(halflife) => {
                if !halflife.is_finite() || halflife <= 0.0 {
                    return Err(BandError::InvalidParameter(format!(
                        "halflife must be a finite value > 0, got {}",
                        halflife
                    )));
                }
                Ok(1.0 - (-std::f64::consts::LN_2 / halflife).exp())
            }
            Decay::Alpha(alpha) => {
                if !(alpha > 0.0 && alpha <= 1.0) {
                    return Err(BandError::InvalidParameter(format!(
                        "alpha must satisfy 0 < alpha <= 1, got {}",
                        alpha
                    )));
                }
                Ok(alpha)
            }
        }
    }
}

/// Options shared by the exponentially weighted statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EwmConfig {
    /// Smoothing factor in `(0, 1]`.
    pub alpha: f64,
    /// Normalize weights over the observed history (see module docs).
    pub adjust: bool,
    /// Report the biased (population) variance instead of the corrected one.
    pub bias: bool,
    /// Minimum number of observations before a value is reported.
    pub min_periods: usize,
    /// Skip missing values when decaying weights.
    pub ignore_na: bool,
}

impl EwmConfig {
    pub fn new(decay: Decay) -> Result<Self> {
        Ok(Self {
            alpha: decay.alpha()?,
            adjust: true,
            bias: false,
            min_periods: 0,
            ignore_na: false,
        })
    }

    /// Shorthand for `EwmConfig::new(Decay::Span(span))`.
    pub fn from_span(span: f64) -> Result<Self> {
        Self::new(Decay::Span(span))
    }

    pub fn with_adjust(mut self, adjust: bool) -> Self {
        self.adjust = adjust;
        self
    }

    pub fn with_bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    pub fn with_ignore_na(mut self, ignore_na: bool) -> Self {
        self.ignore_na = ignore_na;
        self
    }

    fn new_weight(&self) -> f64 {
        if self.adjust {
            1.0
        } else {
            self.alpha
        }
    }
}

/// Compute the exponentially weighted moving average.
pub fn ewm_mean(series: &[f64], config: &EwmConfig) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }

    let min_periods = config.min_periods.max(1);
    let old_wt_factor = 1.0 - config.alpha;
    let new_wt = config.new_weight();

    let mut result = Vec::with_capacity(series.len());
    let mut weighted = series[0];
    let mut nobs = usize::from(!weighted.is_nan());
    let mut old_wt = 1.0;

    result.push(if nobs >= min_periods { weighted } else { f64::NAN });

    for &x in &series[1..] {
        let is_obs = !x.is_nan();
        nobs += usize::from(is_obs);

        if !weighted.is_nan() {
            if is_obs || !config.ignore_na {
                old_wt *= old_wt_factor;
                if is_obs {
                    // Skipping the update keeps constant runs exact.
                    if weighted != x {
                        weighted = (old_wt * weighted + new_wt * x) / (old_wt + new_wt);
                    }
                    if config.adjust {
                        old_wt += new_wt;
                    } else {
                        old_wt = 1.0;
                    }
                }
            }
        } else if is_obs {
            weighted = x;
        }

        result.push(if nobs >= min_periods { weighted } else { f64::NAN });
    }

    result
}

/// Compute the exponentially weighted moving variance.
///
/// Unless `config.bias` is set, the weighted variance is scaled by
/// `(Σw)² / ((Σw)² - Σw²)`, which is undefined (NaN) until at least two
/// observations have been seen.
pub fn ewm_var(series: &[f64], config: &EwmConfig) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }

    let min_periods = config.min_periods.max(1);
    let old_wt_factor = 1.0 - config.alpha;
    let new_wt = config.new_weight();

    let mut result = Vec::with_capacity(series.len());
    let mut mean = series[0];
    let mut nobs = usize::from(!mean.is_nan());
    let mut old_wt = 1.0;
    let mut sum_wt = 1.0;
    let mut sum_wt2 = 1.0;
    let mut cov = 0.0;

    let first = if nobs >= min_periods && config.bias {
        0.0
    } else {
        f64::NAN
    };
    result.push(first);

    for &x in &series[1..] {
        let is_obs = !x.is_nan();
        nobs += usize::from(is_obs);

        if !mean.is_nan() {
            if is_obs || !config.ignore_na {
                sum_wt *= old_wt_factor;
                sum_wt2 *= old_wt_factor * old_wt_factor;
                old_wt *= old_wt_factor;
                if is_obs {
                    let old_mean = mean;
                    if mean != x {
                        mean = (old_wt * old_mean + new_wt * x) / (old_wt + new_wt);
                    }
                    cov = (old_wt * (cov + (old_mean - mean) * (old_mean - mean))
                        + new_wt * (x - mean) * (x - mean))
                        / (old_wt + new_wt);
                    sum_wt += new_wt;
                    sum_wt2 += new_wt * new_wt;
                    old_wt += new_wt;
                    if !config.adjust {
                        sum_wt /= old_wt;
                        sum_wt2 /= old_wt * old_wt;
                        old_wt = 1.0;
                    }
                }
            }
        } else if is_obs {
            mean = x;
        }

        let value = if nobs < min_periods {
            f64::NAN
        } else if config.bias {
            cov
        } else {
            let numerator = sum_wt * sum_wt;
            let denominator = numerator - sum_wt2;
            if denominator > 0.0 {
                numerator / denominator * cov
            } else {
                f64::NAN
            }
        };
        result.push(value);
    }

    result
}

/// Compute the exponentially weighted moving standard deviation.
pub fn ewm_std(series: &[f64], config: &EwmConfig) -> Vec<f64> {
    ewm_var(series, config).iter().map(|v| v.sqrt()).collect()
}
