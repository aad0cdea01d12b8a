//! Forecasting models.

mod traits;

pub mod sarima;

pub use sarima::{ModelSpec, ModelSummary, Sarima, SarimaOrder, SeasonalOrder};
pub use traits::{Forecaster, PredictionIntervals};
