//! Forecaster trait defining the common interface for fitted models.

use crate::core::PriceSeries;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Point forecasts with symmetric prediction intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionIntervals {
    /// Nominal coverage, e.g. 0.95.
    pub level: f64,
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl PredictionIntervals {
    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}

/// Common interface for forecasting models.
///
/// Observation indices count from zero at the first value passed to
/// [`Forecaster::fit`]; indices at or beyond the series length are
/// out-of-sample.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &PriceSeries) -> Result<()>;

    /// Predictions for every index in `start..=end`.
    fn predict_range(&self, start: usize, end: usize) -> Result<Vec<f64>>;

    /// Forecast `steps` values past the end of the fitted series.
    fn forecast(&self, steps: usize) -> Result<Vec<f64>> {
        let n = self.nobs().ok_or(ForecastError::ModelNotFitted)?;
        if steps == 0 {
            return Ok(Vec::new());
        }
        self.predict_range(n, n + steps - 1)
    }

    /// Forecast `steps` values with intervals at the given coverage level.
    fn predict_intervals(&self, steps: usize, level: f64) -> Result<PredictionIntervals>;

    /// Length of the fitted series.
    fn nobs(&self) -> Option<usize>;

    /// In-sample one-step-ahead predictions (NaN where undefined).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted; NaN where undefined).
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
