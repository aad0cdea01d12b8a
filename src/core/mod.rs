//! Core data structures for price series and forecasts.

mod forecast;
mod price_series;

pub use forecast::{daily_dates_after, DatedValue, ForecastResult};
pub use price_series::{PriceSeries, PriceTable};
