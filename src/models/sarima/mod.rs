//! Seasonal ARIMA models.
//!
//! This module provides:
//! - Order specification and validation, SARIMA(p,d,q)x(P,D,Q,s)
//! - Conditional maximum-likelihood estimation with stationarity and
//!   invertibility enforced by reparameterisation
//! - Forecasts, prediction intervals and a fitted-model summary

mod diff;
mod model;
mod order;
mod params;
mod summary;

pub use diff::{difference, differencing_polynomial, integrate, seasonal_difference};
pub use model::Sarima;
pub use order::{ModelSpec, OrderBounds, SarimaOrder, SeasonalOrder};
pub use params::SarimaParams;
pub use summary::{CoefficientEstimate, ModelSummary};
