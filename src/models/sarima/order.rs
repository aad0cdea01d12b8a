//! SARIMA order specification and validation.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-seasonal (p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SarimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl SarimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Seasonal (P, D, Q, s) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order (P)
    pub p: usize,
    /// Seasonal differencing order (D)
    pub d: usize,
    /// Seasonal MA order (Q)
    pub q: usize,
    /// Seasonal period (s)
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    /// No seasonal terms.
    pub fn none() -> Self {
        Self::new(0, 0, 0, 1)
    }

    /// Seasonal orders copied from the non-seasonal ones.
    ///
    /// This reproduces the dashboard's historical coupling of (P, D, Q) to
    /// (p, d, q); callers should prefer independent seasonal orders.
    pub fn mirrored(order: SarimaOrder, period: usize) -> Self {
        Self::new(order.p, order.d, order.q, period)
    }

    pub fn has_terms(&self) -> bool {
        self.p + self.d + self.q > 0
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for SeasonalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.p, self.d, self.q, self.period)
    }
}

/// Upper bounds accepted for model orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBounds {
    /// Largest value accepted for any of p, d, q, P, D, Q.
    pub max_order: usize,
    /// Largest seasonal period.
    pub max_seasonal_period: usize,
}

impl Default for OrderBounds {
    fn default() -> Self {
        Self {
            max_order: 5,
            max_seasonal_period: 24,
        }
    }
}

/// Full SARIMA(p,d,q)x(P,D,Q,s) model specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModelSpec {
    pub order: SarimaOrder,
    pub seasonal: SeasonalOrder,
    /// Estimate an intercept for the differenced series.
    pub include_constant: bool,
}

impl ModelSpec {
    pub fn new(order: SarimaOrder, seasonal: SeasonalOrder) -> Self {
        Self {
            order,
            seasonal,
            include_constant: false,
        }
    }

    pub fn with_constant(mut self, include_constant: bool) -> Self {
        self.include_constant = include_constant;
        self
    }

    /// Check the orders against `bounds`.
    pub fn validate(&self, bounds: &OrderBounds) -> Result<()> {
        let orders = [
            ("p", self.order.p),
            ("d", self.order.d),
            ("q", self.order.q),
            ("P", self.seasonal.p),
            ("D", self.seasonal.d),
            ("Q", self.seasonal.q),
        ];
        if let Some((label, value)) = orders.iter().find(|(_, v)| *v > bounds.max_order) {
            return Err(ForecastError::InvalidOrder(format!(
                "{} = {} exceeds the maximum order {}",
                label, value, bounds.max_order
            )));
        }

        let s = self.seasonal.period;
        if s == 0 {
            return Err(ForecastError::InvalidOrder(
                "seasonal period must be at least 1".into(),
            ));
        }
        if s > bounds.max_seasonal_period {
            return Err(ForecastError::InvalidOrder(format!(
                "seasonal period {} exceeds the maximum {}",
                s, bounds.max_seasonal_period
            )));
        }
        if s == 1 && self.seasonal.has_terms() {
            return Err(ForecastError::InvalidOrder(
                "seasonal terms require a seasonal period greater than 1".into(),
            ));
        }
        Ok(())
    }

    /// Observations consumed by differencing: `d + D * s`.
    pub fn differencing_loss(&self) -> usize {
        self.order.d + self.seasonal.d * self.seasonal.period
    }

    /// Degree of the expanded AR polynomial: `p + P * s`.
    pub fn ar_span(&self) -> usize {
        self.order.p + self.seasonal.p * self.seasonal.period
    }

    /// Degree of the expanded MA polynomial: `q + Q * s`.
    pub fn ma_span(&self) -> usize {
        self.order.q + self.seasonal.q * self.seasonal.period
    }

    /// Number of ARMA coefficients (excluding intercept and variance).
    pub fn n_arma(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    /// Number of estimated parameters, including the innovation variance.
    pub fn n_params(&self) -> usize {
        self.n_arma() + usize::from(self.include_constant) + 1
    }

    /// Shortest series for which the conditional likelihood is estimable.
    pub fn min_observations(&self) -> usize {
        self.differencing_loss() + self.ar_span() + self.n_params() + 1
    }

    /// Shortest series that spans two full seasonal cycles; zero without a
    /// seasonal period.
    pub fn min_seasonal_length(&self) -> usize {
        if self.seasonal.period > 1 {
            2 * self.seasonal.period
        } else {
            0
        }
    }

    /// Parameter names in estimation order.
    pub fn param_names(&self) -> Vec<String> {
        let s = self.seasonal.period;
        let mut names = Vec::with_capacity(self.n_params());
        if self.include_constant {
            names.push("intercept".to_string());
        }
        names.extend((1..=self.order.p).map(|i| format!("ar.L{}", i)));
        names.extend((1..=self.order.q).map(|i| format!("ma.L{}", i)));
        names.extend((1..=self.seasonal.p).map(|i| format!("ar.S.L{}", i * s)));
        names.extend((1..=self.seasonal.q).map(|i| format!("ma.S.L{}", i * s)));
        names.push("sigma2".to_string());
        names
    }

    /// Display name, e.g. `SARIMAX(2, 1, 2)x(1, 1, 1, 12)`.
    pub fn name(&self) -> String {
        if self.seasonal.has_terms() {
            format!("SARIMAX{}x{}", self.order, self.seasonal)
        } else {
            format!("SARIMAX{}", self.order)
        }
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
