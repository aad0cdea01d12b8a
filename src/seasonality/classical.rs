//! Classical moving-average seasonal decomposition.
//!
//! The trend is a centered moving average spanning one full cycle, the
//! seasonal component is the average detrended value at each position of the
//! cycle, and the residual is what remains.

use crate::error::{ForecastError, Result};
use crate::utils::stats::mean_defined;
use serde::{Deserialize, Serialize};

/// How the components combine into the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionModel {
    /// `value = trend + seasonal + residual`
    #[default]
    Additive,
    /// `value = trend * seasonal * residual`
    Multiplicative,
}

/// Result of a classical decomposition.
///
/// `trend` and `residual` are undefined (`None`) for the first and last
/// `period / 2` observations, where the centered window does not fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub model: DecompositionModel,
    pub period: usize,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.seasonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasonal.is_empty()
    }

    /// Number of undefined trend points at each edge.
    pub fn edge_width(&self) -> usize {
        self.period / 2
    }

    /// Recombine the components; `None` where trend or residual is undefined.
    pub fn reconstruct(&self) -> Vec<Option<f64>> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|((t, s), r)| match (t, r) {
                (Some(t), Some(r)) => Some(match self.model {
                    DecompositionModel::Additive => t + s + r,
                    DecompositionModel::Multiplicative => t * s * r,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Classical decomposition with a fixed seasonal period.
#[derive(Debug, Clone)]
pub struct ClassicalDecomposition {
    period: usize,
    model: DecompositionModel,
}

impl ClassicalDecomposition {
    /// Additive decomposition with the given period.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            model: DecompositionModel::Additive,
        }
    }

    pub fn multiplicative(period: usize) -> Self {
        Self {
            period,
            model: DecompositionModel::Multiplicative,
        }
    }

    pub fn with_model(mut self, model: DecompositionModel) -> Self {
        self.model = model;
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Decompose `series` into trend, seasonal and residual components.
    pub fn decompose(&self, series: &[f64]) -> Result<DecompositionResult> {
        let period = self.period;
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "decomposition period must be at least 1".into(),
            ));
        }
        let n = series.len();
        if n < 2 * period {
            return Err(ForecastError::InsufficientData {
                needed: 2 * period,
                got: n,
            });
        }
        if self.model == DecompositionModel::Multiplicative && series.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "multiplicative decomposition requires strictly positive values".into(),
            ));
        }

        let trend = centered_moving_average(series, period);

        let detrended: Vec<Option<f64>> = series
            .iter()
            .zip(&trend)
            .map(|(&v, t)| {
                t.map(|t| match self.model {
                    DecompositionModel::Additive => v - t,
                    DecompositionModel::Multiplicative => v / t,
                })
            })
            .collect();

        let mut cycle: Vec<f64> = (0..period)
            .map(|pos| {
                let at_pos: Vec<Option<f64>> =
                    detrended.iter().skip(pos).step_by(period).copied().collect();
                mean_defined(&at_pos).unwrap_or(0.0)
            })
            .collect();

        let cycle_mean = cycle.iter().sum::<f64>() / period as f64;
        match self.model {
            DecompositionModel::Additive => cycle.iter_mut().for_each(|c| *c -= cycle_mean),
            DecompositionModel::Multiplicative => cycle.iter_mut().for_each(|c| *c /= cycle_mean),
        }

        let seasonal: Vec<f64> = (0..n).map(|i| cycle[i % period]).collect();

        let residual = detrended
            .iter()
            .zip(&seasonal)
            .map(|(d, s)| {
                d.map(|d| match self.model {
                    DecompositionModel::Additive => d - s,
                    DecompositionModel::Multiplicative => d / s,
                })
            })
            .collect();

        Ok(DecompositionResult {
            model: self.model,
            period,
            trend,
            seasonal,
            residual,
        })
    }
}

/// Centered moving average over one cycle.
///
/// Odd periods use `period` equal weights; even periods use the `2 x period`
/// filter with half weights on the two outermost taps.
fn centered_moving_average(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &series[i - half..=i + half];
            Some(window.iter().zip(&weights).map(|(v, w)| v * w).sum())
        })
        .collect()
}
