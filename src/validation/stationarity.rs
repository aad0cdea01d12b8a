//! Augmented Dickey-Fuller stationarity test.
//!
//! Tests the null hypothesis that a series has a unit root. A p-value below
//! the significance level rejects the null, i.e. the series is stationary.

use crate::error::{ForecastError, Result};
use crate::utils::ols::{ols_fit, OlsFit};
use crate::utils::stats::normal_cdf;
use serde::{Deserialize, Serialize};

/// Default significance level for the stationarity verdict.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Fewest observations for which a lag-0 regression with constant is defined.
pub const MIN_OBSERVATIONS: usize = 4;

/// Result of an Augmented Dickey-Fuller test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    /// Test statistic (t ratio of the lagged level coefficient).
    pub statistic: f64,
    /// MacKinnon approximate p-value.
    pub p_value: f64,
    /// Number of lagged differences selected by AIC.
    pub used_lag: usize,
    /// Observations in the final regression.
    pub nobs: usize,
    /// Critical values at common significance levels.
    pub critical_values: CriticalValues,
}

impl AdfResult {
    /// Stationary iff the p-value is strictly below `alpha`.
    pub fn is_stationary_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Verdict at the conventional 5% level.
    pub fn is_stationary(&self) -> bool {
        self.is_stationary_at(DEFAULT_SIGNIFICANCE)
    }
}

/// Critical values for the test statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

// MacKinnon (1994) response surface, constant only, one variable.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) finite-sample critical value coefficients, constant only.
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Augmented Dickey-Fuller test with a constant.
///
/// Regression: `Δy_t = α + γ y_{t-1} + Σ β_i Δy_{t-i} + ε_t`.
///
/// # Arguments
/// * `series` - Time series data
/// * `max_lag` - Largest lag considered (default: `ceil(12 * (n/100)^(1/4))`)
///
/// The lag is chosen by AIC on a common sample, then the regression is
/// re-estimated with that lag on every usable observation.
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult> {
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }

    let default_lag = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lag = max_lag.unwrap_or(default_lag).min(n / 2 - 2);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=max_lag {
        let Ok(fit) = adf_regression(series, &diff, lag, max_lag) else {
            continue;
        };
        let aic = fit.aic();
        if aic.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| aic < b) {
            best = Some((lag, aic));
        }
    }
    let (used_lag, _) = best.ok_or_else(|| {
        ForecastError::ComputationError("ADF regression is singular for every lag".into())
    })?;

    let fit = adf_regression(series, &diff, used_lag, used_lag)?;
    let statistic = fit.t_stat(1);
    if !statistic.is_finite() {
        return Err(ForecastError::ComputationError(
            "ADF regression has zero residual variance; the series is deterministic".into(),
        ));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        nobs: fit.nobs,
        critical_values: critical_values(fit.nobs),
    })
}

/// Fit the ADF regression with `lag` lagged differences, using the rows that
/// have `first_row` differences of history available.
fn adf_regression(series: &[f64], diff: &[f64], lag: usize, first_row: usize) -> Result<OlsFit> {
    let rows = first_row..diff.len();
    let y: Vec<f64> = diff[rows.clone()].to_vec();
    let design: Vec<Vec<f64>> = rows
        .map(|j| {
            let mut row = Vec::with_capacity(lag + 2);
            row.push(1.0);
            row.push(series[j]);
            row.extend((1..=lag).map(|i| diff[j - i]));
            row
        })
        .collect();
    ols_fit(&y, &design)
}

/// MacKinnon approximate p-value for the constant-only ADF statistic.
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let poly = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);
    normal_cdf(poly)
}

/// Finite-sample critical values for a regression with `nobs` observations.
pub fn critical_values(nobs: usize) -> CriticalValues {
    let eval = |b: &[f64; 4]| {
        let inv = 1.0 / nobs as f64;
        b[0] + b[1] * inv + b[2] * inv * inv + b[3] * inv * inv * inv
    };
    CriticalValues {
        cv_1pct: eval(&CRIT_1PCT),
        cv_5pct: eval(&CRIT_5PCT),
        cv_10pct: eval(&CRIT_10PCT),
    }
}
