//! Forecast result structure: predictions re-indexed onto calendar dates.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single dated value, used for forecasts and chart overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Point forecasts aligned onto a daily calendar, with optional intervals.
///
/// Dates start the day after the anchor and advance one calendar day per
/// step. Unlike the trading-day history, weekends are not skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<DatedValue>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

/// Consecutive daily dates `anchor + 1 ..= anchor + len`.
pub fn daily_dates_after(anchor: NaiveDate, len: usize) -> Vec<NaiveDate> {
    (1..=len as i64).map(|i| anchor + Duration::days(i)).collect()
}

impl ForecastResult {
    /// Assign daily dates after `anchor` to a sequence of predictions.
    pub fn from_predictions(predictions: Vec<f64>, anchor: NaiveDate) -> Self {
        let dates = daily_dates_after(anchor, predictions.len());
        Self {
            points: dates
                .into_iter()
                .zip(predictions)
                .map(|(date, value)| DatedValue { date, value })
                .collect(),
            lower: None,
            upper: None,
        }
    }

    /// Attach prediction interval bounds; ignored unless lengths match.
    pub fn with_intervals(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        if lower.len() == self.points.len() && upper.len() == self.points.len() {
            self.lower = Some(lower);
            self.upper = Some(upper);
        }
        self
    }

    /// Number of dated points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DatedValue] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}
