//! # stock-forecast
//!
//! Analysis backend for a stock-price forecasting dashboard.
//!
//! Fetches daily price tables for a fixed set of tickers, checks the chosen
//! price column for stationarity with the augmented Dickey-Fuller test,
//! decomposes it into trend, seasonal and residual parts, fits a seasonal
//! ARIMA model and forecasts calendar days past the requested range.

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod market_data;
pub mod models;
pub mod pipeline;
pub mod seasonality;
pub mod session;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::{AnchorPolicy, PipelineConfig};
    pub use crate::core::{DatedValue, ForecastResult, PriceSeries, PriceTable};
    pub use crate::error::{ForecastError, Result};
    pub use crate::market_data::{CsvMarketData, MarketDataProvider, Ticker};
    pub use crate::models::{Forecaster, ModelSpec, ModelSummary, Sarima, SarimaOrder, SeasonalOrder};
    pub use crate::pipeline::{ForecastHorizon, PipelineParams, PipelineReport, TimeSeriesPipeline};
    pub use crate::seasonality::{ClassicalDecomposition, DecompositionModel, DecompositionResult};
    pub use crate::session::{AnalysisRequest, AuthStatus, Session};
    pub use crate::validation::{adf_test, AdfResult};
}
