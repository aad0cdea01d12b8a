//! Pipeline configuration with environment overrides.

use crate::error::{ForecastError, Result};
use crate::models::sarima::OrderBounds;
use crate::seasonality::DecompositionModel;
use crate::utils::optimization::NelderMeadConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which date forecast dates are counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// The end date of the request, whether or not it was a trading day.
    #[default]
    RequestEnd,
    /// The date of the last observation in the series.
    LastObservation,
}

impl FromStr for AnchorPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "request_end" | "end" => Ok(AnchorPolicy::RequestEnd),
            "last_observation" | "last" => Ok(AnchorPolicy::LastObservation),
            other => Err(ForecastError::Config(format!(
                "unknown anchor policy '{}'",
                other
            ))),
        }
    }
}

/// Tunable settings for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Significance level of the stationarity verdict.
    pub significance: f64,
    /// Largest accepted forecast horizon.
    pub max_horizon: usize,
    /// Largest accepted value of p, d, q, P, D, Q.
    pub max_order: usize,
    /// Largest accepted seasonal period.
    pub max_seasonal_period: usize,
    /// Period used when the request does not set one.
    pub decomposition_period: usize,
    pub decomposition_model: DecompositionModel,
    /// Nelder-Mead iteration budget.
    pub optimizer_iterations: usize,
    pub optimizer_tolerance: f64,
    /// Estimate an intercept for the differenced series.
    pub include_constant: bool,
    /// Coverage of the forecast intervals.
    pub interval_level: f64,
    pub anchor: AnchorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            significance: 0.05,
            max_horizon: 365,
            max_order: 5,
            max_seasonal_period: 24,
            decomposition_period: 12,
            decomposition_model: DecompositionModel::Additive,
            optimizer_iterations: 10_000,
            optimizer_tolerance: 1e-8,
            include_constant: false,
            interval_level: 0.95,
            anchor: AnchorPolicy::RequestEnd,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `FORECAST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `FORECAST_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            let value = lookup(key);
            if let Some(v) = &value {
                debug!("config override {}={}", key, v);
            }
            value
        };

        if let Some(v) = get("FORECAST_SIGNIFICANCE") {
            config.significance = parse("FORECAST_SIGNIFICANCE", &v)?;
        }
        if let Some(v) = get("FORECAST_MAX_HORIZON") {
            config.max_horizon = parse("FORECAST_MAX_HORIZON", &v)?;
        }
        if let Some(v) = get("FORECAST_MAX_ORDER") {
            config.max_order = parse("FORECAST_MAX_ORDER", &v)?;
        }
        if let Some(v) = get("FORECAST_MAX_SEASONAL_PERIOD") {
            config.max_seasonal_period = parse("FORECAST_MAX_SEASONAL_PERIOD", &v)?;
        }
        if let Some(v) = get("FORECAST_DECOMPOSITION_PERIOD") {
            config.decomposition_period = parse("FORECAST_DECOMPOSITION_PERIOD", &v)?;
        }
        if let Some(v) = get("FORECAST_DECOMPOSITION_MODEL") {
            config.decomposition_model = match v.trim().to_ascii_lowercase().as_str() {
                "additive" => DecompositionModel::Additive,
                "multiplicative" => DecompositionModel::Multiplicative,
                other => {
                    return Err(ForecastError::Config(format!(
                        "FORECAST_DECOMPOSITION_MODEL: unknown model '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(v) = get("FORECAST_OPTIMIZER_ITERATIONS") {
            config.optimizer_iterations = parse("FORECAST_OPTIMIZER_ITERATIONS", &v)?;
        }
        if let Some(v) = get("FORECAST_OPTIMIZER_TOLERANCE") {
            config.optimizer_tolerance = parse("FORECAST_OPTIMIZER_TOLERANCE", &v)?;
        }
        if let Some(v) = get("FORECAST_INCLUDE_CONSTANT") {
            config.include_constant = parse("FORECAST_INCLUDE_CONSTANT", &v)?;
        }
        if let Some(v) = get("FORECAST_INTERVAL_LEVEL") {
            config.interval_level = parse("FORECAST_INTERVAL_LEVEL", &v)?;
        }
        if let Some(v) = get("FORECAST_ANCHOR") {
            config.anchor = v.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no pipeline run could use.
    pub fn validate(&self) -> Result<()> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ForecastError::Config(format!(
                "significance must be in (0, 1), got {}",
                self.significance
            )));
        }
        if !(self.interval_level > 0.0 && self.interval_level < 1.0) {
            return Err(ForecastError::Config(format!(
                "interval level must be in (0, 1), got {}",
                self.interval_level
            )));
        }
        if self.max_horizon == 0 {
            return Err(ForecastError::Config("max horizon must be at least 1".into()));
        }
        if self.max_seasonal_period == 0 || self.decomposition_period == 0 {
            return Err(ForecastError::Config(
                "seasonal and decomposition periods must be at least 1".into(),
            ));
        }
        if self.optimizer_iterations == 0 || !(self.optimizer_tolerance > 0.0) {
            return Err(ForecastError::Config(
                "optimizer needs a positive iteration budget and tolerance".into(),
            ));
        }
        Ok(())
    }

    pub fn order_bounds(&self) -> OrderBounds {
        OrderBounds {
            max_order: self.max_order,
            max_seasonal_period: self.max_seasonal_period,
        }
    }

    pub fn optimizer(&self) -> NelderMeadConfig {
        NelderMeadConfig {
            max_iter: self.optimizer_iterations,
            tolerance: self.optimizer_tolerance,
            ..Default::default()
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ForecastError::Config(format!("{}: {} ('{}')", key, e, value)))
}
