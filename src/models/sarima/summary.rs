//! Fitted-model summary: coefficient table, information criteria and
//! residual diagnostics.

use crate::utils::stats::{quantile_normal, two_sided_normal_p};
use crate::validation::{JarqueBeraResult, LjungBoxResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    /// Wald statistic `estimate / std_error`.
    pub z: f64,
    /// Two-sided p-value under the standard normal.
    pub p_value: f64,
    /// Lower bound of the 95% confidence interval.
    pub ci_lower: f64,
    /// Upper bound of the 95% confidence interval.
    pub ci_upper: f64,
}

impl CoefficientEstimate {
    pub fn new(name: impl Into<String>, estimate: f64, std_error: f64) -> Self {
        let z = estimate / std_error;
        let half_width = quantile_normal(0.975) * std_error;
        Self {
            name: name.into(),
            estimate,
            std_error,
            z,
            p_value: two_sided_normal_p(z),
            ci_lower: estimate - half_width,
            ci_upper: estimate + half_width,
        }
    }
}

/// Summary of a fitted SARIMA model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model name, e.g. `SARIMAX(2, 1, 2)x(1, 1, 1, 12)`.
    pub model: String,
    /// Observations entering the likelihood.
    pub nobs: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    /// Innovation variance.
    pub sigma2: f64,
    pub coefficients: Vec<CoefficientEstimate>,
    pub ljung_box: LjungBoxResult,
    pub jarque_bera: JarqueBeraResult,
    /// Optimiser iterations used by the fit.
    pub iterations: usize,
}

impl ModelSummary {
    /// Look up a coefficient by name (`ar.L1`, `ma.S.L12`, `sigma2`, ...).
    pub fn coefficient(&self, name: &str) -> Option<&CoefficientEstimate> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// AIC, BIC and HQIC for a log-likelihood with `k` parameters over `nobs`
/// observations.
pub fn information_criteria(log_likelihood: f64, k: usize, nobs: usize) -> (f64, f64, f64) {
    let k = k as f64;
    let n = nobs as f64;
    let deviance = -2.0 * log_likelihood;
    (
        deviance + 2.0 * k,
        deviance + k * n.ln(),
        deviance + 2.0 * k * n.ln().ln(),
    )
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(78);
        let thin = "-".repeat(78);

        writeln!(f, "{:^78}", "SARIMAX Results")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Model: {:<36} No. Observations: {:>15}",
            self.model, self.nobs
        )?;
        writeln!(
            f,
            "Log Likelihood: {:<27.3} AIC: {:>28.3}",
            self.log_likelihood, self.aic
        )?;
        writeln!(
            f,
            "Iterations: {:<31} BIC: {:>28.3}",
            self.iterations, self.bic
        )?;
        writeln!(f, "{:<43} HQIC: {:>27.3}", "", self.hqic)?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{:<12} {:>10} {:>10} {:>9} {:>8} {:>11} {:>11}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", thin)?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<12} {:>10.4} {:>10.4} {:>9.3} {:>8.3} {:>11.4} {:>11.4}",
                c.name, c.estimate, c.std_error, c.z, c.p_value, c.ci_lower, c.ci_upper
            )?;
        }
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Ljung-Box (L{}) (Q): {:<22.2} Jarque-Bera (JB): {:>14.2}",
            self.ljung_box.lags, self.ljung_box.statistic, self.jarque_bera.statistic
        )?;
        writeln!(
            f,
            "Prob(Q): {:<34.2} Prob(JB): {:>22.2}",
            self.ljung_box.p_value, self.jarque_bera.p_value
        )?;
        writeln!(
            f,
            "Skew: {:<37.2} Kurtosis: {:>22.2}",
            self.jarque_bera.skew, self.jarque_bera.kurtosis
        )?;
        write!(f, "{}", rule)
    }
}
