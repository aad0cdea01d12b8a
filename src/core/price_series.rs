//! Daily price data: the multi-column table returned by a market-data
//! provider and the single-column series the pipeline analyses.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ForecastError::TimestampError(format!(
                "dates must be strictly increasing ({} follows {})",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

/// A single named price column indexed by trading date.
///
/// Dates are strictly increasing but not contiguous: weekends and market
/// holidays are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl PriceSeries {
    /// Create a series, validating ordering, length and finiteness.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        validate_dates(&dates)?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// Column name this series was taken from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Daily OHLCV-style table: one date index, several named numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl PriceTable {
    /// Create a table, checking that every column has one value per date.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        validate_dates(&dates)?;
        for (_, values) in &columns {
            if values.len() != dates.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: dates.len(),
                    got: values.len(),
                });
            }
        }
        Ok(Self { dates, columns })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Names of all value columns, in provider order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(col, _)| col.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Select one column as a [`PriceSeries`].
    pub fn select(&self, name: &str) -> Result<PriceSeries> {
        if self.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let (col, values) = self
            .columns
            .iter()
            .find(|(col, _)| col.eq_ignore_ascii_case(name))
            .ok_or_else(|| ForecastError::UnknownColumn {
                column: name.to_string(),
                available: self.column_names().join(", "),
            })?;

        PriceSeries::new(col.clone(), self.dates.clone(), values.clone())
    }
}
