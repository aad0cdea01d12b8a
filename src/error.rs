//! Error types for the stock-forecast library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fetching, analysing or forecasting a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Model orders are out of bounds or leave nothing to estimate.
    #[error("invalid model order: {0}")]
    InvalidOrder(String),

    /// The likelihood optimiser did not converge.
    #[error("optimizer did not converge after {iterations} iterations")]
    Convergence { iterations: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    ModelNotFitted,

    /// Forecast horizon is outside the accepted range.
    #[error("invalid forecast horizon {horizon}: must be between 1 and {max}")]
    InvalidHorizon { horizon: i64, max: usize },

    /// The market-data provider failed.
    #[error("market data fetch failed: {0}")]
    UpstreamFetch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Missing or non-finite values in a price column.
    #[error("missing values detected in data")]
    MissingValues,

    /// Requested column is not part of the price table.
    #[error("unknown column '{column}' (available: {available})")]
    UnknownColumn { column: String, available: String },

    /// Ticker symbol is not on the supported list.
    #[error("unknown ticker '{0}'")]
    UnknownTicker(String),

    /// The session is not authenticated.
    #[error("session is not authenticated")]
    Unauthenticated,

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Configuration value could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ForecastError {
    /// Suggestion for the input a user should change to recover.
    pub fn hint(&self) -> &'static str {
        match self {
            ForecastError::EmptyData => "choose a wider date range",
            ForecastError::InsufficientData { .. } => {
                "choose a wider date range or reduce the seasonal period"
            }
            ForecastError::InvalidOrder(_) => {
                "choose smaller p/d/q or seasonal orders, or a shorter seasonal period"
            }
            ForecastError::Convergence { .. } => {
                "try lower model orders or a shorter differencing order"
            }
            ForecastError::ModelNotFitted => "fit the model before requesting a forecast",
            ForecastError::InvalidHorizon { .. } => "choose a forecast horizon within the allowed range",
            ForecastError::UpstreamFetch(_) => "check the ticker and date range, then retry",
            ForecastError::InvalidParameter(_) => "check the selected parameters",
            ForecastError::DimensionMismatch { .. } => "check that every column has one value per date",
            ForecastError::TimestampError(_) => "check the dates in the price data",
            ForecastError::MissingValues => "choose a column or date range without gaps",
            ForecastError::UnknownColumn { .. } => "select one of the available columns",
            ForecastError::UnknownTicker(_) => "select a ticker from the supported list",
            ForecastError::Unauthenticated => "log in before running a forecast",
            ForecastError::ComputationError(_) => "choose a different column or date range",
            ForecastError::Config(_) => "fix the FORECAST_* environment settings",
        }
    }
}
