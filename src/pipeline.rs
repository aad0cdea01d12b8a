//! The analysis pipeline: stationarity check, seasonal decomposition,
//! SARIMA fit and forecast, aligned onto calendar dates.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use stock_forecast::prelude::*;
//!
//! # fn main() -> stock_forecast::Result<()> {
//! let provider = CsvMarketData::new("data");
//! let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let series = provider.fetch(Ticker::Aapl, start, end)?.select("Close")?;
//!
//! let params = PipelineParams::new("Close", SarimaOrder::new(2, 1, 2), 12, 10);
//! let report = TimeSeriesPipeline::default().run(&series, &params, end)?;
//! println!("{}", report.model);
//! # Ok(())
//! # }
//! ```

use crate::config::{AnchorPolicy, PipelineConfig};
use crate::core::{DatedValue, ForecastResult, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::models::sarima::{ModelSpec, ModelSummary, Sarima, SarimaOrder, SeasonalOrder};
use crate::models::Forecaster;
use crate::seasonality::{ClassicalDecomposition, DecompositionResult};
use crate::validation::{adf_test, AdfResult};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// A validated forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastHorizon(usize);

impl ForecastHorizon {
    /// Accepts `1..=max`.
    pub fn new(horizon: i64, max: usize) -> Result<Self> {
        match usize::try_from(horizon) {
            Ok(h) if h >= 1 && h <= max => Ok(Self(h)),
            _ => Err(ForecastError::InvalidHorizon { horizon, max }),
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for ForecastHorizon {
    type Error = ForecastError;

    fn try_from(horizon: i64) -> Result<Self> {
        Self::new(horizon, PipelineConfig::default().max_horizon)
    }
}

/// User-selected analysis parameters for one series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Price column to analyse.
    pub column: String,
    pub order: SarimaOrder,
    /// Seasonal orders; `None` mirrors the non-seasonal orders.
    pub seasonal_order: Option<(usize, usize, usize)>,
    pub seasonal_period: usize,
    /// Decomposition period; `None` uses the configured default.
    pub decomposition_period: Option<usize>,
    /// Forecast horizon as entered; validated when the pipeline runs.
    pub horizon: i64,
}

impl PipelineParams {
    pub fn new(column: impl Into<String>, order: SarimaOrder, seasonal_period: usize, horizon: i64) -> Self {
        Self {
            column: column.into(),
            order,
            seasonal_order: None,
            seasonal_period,
            decomposition_period: None,
            horizon,
        }
    }

    pub fn with_seasonal_order(mut self, p: usize, d: usize, q: usize) -> Self {
        self.seasonal_order = Some((p, d, q));
        self
    }

    pub fn with_decomposition_period(mut self, period: usize) -> Self {
        self.decomposition_period = Some(period);
        self
    }

    /// Seasonal order after resolving the mirrored default.
    pub fn seasonal(&self) -> SeasonalOrder {
        match self.seasonal_order {
            Some((p, d, q)) => SeasonalOrder::new(p, d, q, self.seasonal_period),
            None => SeasonalOrder::mirrored(self.order, self.seasonal_period),
        }
    }
}

/// Outcome of the stationarity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityReport {
    pub adf: AdfResult,
    pub significance: f64,
    pub is_stationary: bool,
}

/// Actual and forecast values on one date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOverlay {
    pub actual: Vec<DatedValue>,
    pub forecast: Vec<DatedValue>,
}

impl ChartOverlay {
    pub fn new(series: &PriceSeries, forecast: &ForecastResult) -> Self {
        Self {
            actual: series
                .iter()
                .map(|(date, value)| DatedValue { date, value })
                .collect(),
            forecast: forecast.points().to_vec(),
        }
    }
}

/// Everything the presentation layer needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub series: PriceSeries,
    pub stationarity: StationarityReport,
    pub decomposition: DecompositionResult,
    pub model: ModelSummary,
    pub forecast: ForecastResult,
    pub overlay: ChartOverlay,
}

/// Runs the analysis stages with one configuration.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesPipeline {
    config: PipelineConfig,
}

impl TimeSeriesPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Augmented Dickey-Fuller verdict at the configured significance level.
    pub fn check_stationarity(&self, series: &PriceSeries) -> Result<StationarityReport> {
        let adf = adf_test(series.values(), None)?;
        let is_stationary = adf.is_stationary_at(self.config.significance);
        info!(
            "ADF statistic {:.4}, p-value {:.4}: {}",
            adf.statistic,
            adf.p_value,
            if is_stationary { "stationary" } else { "non-stationary" }
        );
        Ok(StationarityReport {
            adf,
            significance: self.config.significance,
            is_stationary,
        })
    }

    /// Classical decomposition with the configured model.
    pub fn decompose(&self, series: &PriceSeries, period: usize) -> Result<DecompositionResult> {
        debug!("decomposing {} values with period {}", series.len(), period);
        ClassicalDecomposition::new(period)
            .with_model(self.config.decomposition_model)
            .decompose(series.values())
    }

    /// Model specification for `params`, validated against the configured
    /// bounds.
    pub fn model_spec(&self, params: &PipelineParams) -> Result<ModelSpec> {
        if params.seasonal_order.is_none() {
            warn!(
                "no seasonal order given; mirroring (p, d, q) = {} into (P, D, Q)",
                params.order
            );
        }
        let spec = ModelSpec::new(params.order, params.seasonal())
            .with_constant(self.config.include_constant);
        spec.validate(&self.config.order_bounds())?;
        Ok(spec)
    }

    /// Fit a SARIMA model.
    pub fn fit_model(&self, series: &PriceSeries, spec: ModelSpec) -> Result<Sarima> {
        info!("fitting {} to {} observations", spec, series.len());
        let mut model = Sarima::new(spec)
            .with_bounds(self.config.order_bounds())
            .with_optimizer(self.config.optimizer());
        model.fit(series)?;
        Ok(model)
    }

    /// Forecast `horizon` steps past the end of the series, boundary
    /// included, dated from the day after `anchor`.
    pub fn forecast(
        &self,
        model: &Sarima,
        horizon: ForecastHorizon,
        anchor: NaiveDate,
    ) -> Result<ForecastResult> {
        let n = model.nobs().ok_or(ForecastError::ModelNotFitted)?;
        let predictions = model.predict_range(n, n + horizon.get())?;
        let intervals = model.predict_intervals(predictions.len(), self.config.interval_level)?;
        let forecast = ForecastResult::from_predictions(predictions, anchor)
            .with_intervals(intervals.lower, intervals.upper);
        info!(
            "forecast {} points from {:?} to {:?}",
            forecast.len(),
            forecast.first_date(),
            forecast.last_date()
        );
        Ok(forecast)
    }

    /// Date forecasts are counted from.
    pub fn anchor_date(&self, series: &PriceSeries, request_end: NaiveDate) -> NaiveDate {
        match self.config.anchor {
            AnchorPolicy::RequestEnd => request_end,
            AnchorPolicy::LastObservation => series.last_date().unwrap_or(request_end),
        }
    }

    /// Run every stage. The horizon and orders are validated before any
    /// computation.
    pub fn run(
        &self,
        series: &PriceSeries,
        params: &PipelineParams,
        request_end: NaiveDate,
    ) -> Result<PipelineReport> {
        let horizon = ForecastHorizon::new(params.horizon, self.config.max_horizon)?;
        let spec = self.model_spec(params)?;
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let cycles = spec.min_seasonal_length();
        if series.len() < cycles {
            return Err(ForecastError::InsufficientData {
                needed: cycles,
                got: series.len(),
            });
        }

        let stationarity = self.check_stationarity(series)?;
        let period = params
            .decomposition_period
            .unwrap_or(self.config.decomposition_period);
        let decomposition = self.decompose(series, period)?;
        let model = self.fit_model(series, spec)?;
        let summary = model.summary()?;
        let forecast = self.forecast(&model, horizon, self.anchor_date(series, request_end))?;
        let overlay = ChartOverlay::new(series, &forecast);

        Ok(PipelineReport {
            series: series.clone(),
            stationarity,
            decomposition,
            model: summary,
            forecast,
            overlay,
        })
    }
}
