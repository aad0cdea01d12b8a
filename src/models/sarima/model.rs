//! SARIMA(p,d,q)x(P,D,Q,s) estimated by conditional maximum likelihood.

use super::diff::{difference, differencing_polynomial, integrate, poly_mul, seasonal_difference};
use super::order::{ModelSpec, OrderBounds};
use super::params::{constrain, SarimaParams};
use super::summary::{information_criteria, CoefficientEstimate, ModelSummary};
use crate::core::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::traits::{Forecaster, PredictionIntervals};
use crate::utils::ols::{cholesky, cholesky_inverse};
use crate::utils::optimization::{nelder_mead, numerical_hessian, NelderMeadConfig};
use crate::utils::stats::{mean, quantile_normal};
use crate::validation::{jarque_bera, ljung_box};
use log::debug;

/// Seasonal ARIMA forecasting model.
///
/// The series is differenced `d` times and seasonally differenced `D` times
/// at lag `s`. The ARMA part of the differenced series `w` is
///
/// ```text
/// φ(L) Φ(L^s) (w_t - μ) = θ(L) Θ(L^s) e_t
/// ```
///
/// and is estimated by minimising the conditional sum of squares with
/// pre-sample innovations set to zero. The innovation variance is
/// concentrated out of the Gaussian likelihood.
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: ModelSpec,
    bounds: OrderBounds,
    optimizer: NelderMeadConfig,
    name: String,
    state: Option<FittedState>,
}

#[derive(Debug, Clone)]
struct FittedState {
    observed: Vec<f64>,
    differenced: Vec<f64>,
    params: SarimaParams,
    ar_poly: Vec<f64>,
    ma_poly: Vec<f64>,
    delta: Vec<f64>,
    /// Innovations of the differenced series; zero before the AR span.
    innovations: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    first_index: usize,
    sigma2: f64,
    log_likelihood: f64,
    nobs: usize,
    std_errors: Vec<f64>,
    iterations: usize,
}

impl Sarima {
    /// Create an unfitted model.
    pub fn new(spec: ModelSpec) -> Self {
        Self {
            name: spec.name(),
            spec,
            bounds: OrderBounds::default(),
            optimizer: NelderMeadConfig {
                max_iter: 10_000,
                ..Default::default()
            },
            state: None,
        }
    }

    /// Set the accepted order bounds.
    pub fn with_bounds(mut self, bounds: OrderBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the optimiser configuration.
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Constrained coefficients, once fitted.
    pub fn params(&self) -> Option<&SarimaParams> {
        self.state.as_ref().map(|s| &s.params)
    }

    pub fn sigma2(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sigma2)
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.log_likelihood)
    }

    pub fn aic(&self) -> Option<f64> {
        self.state.as_ref().map(|s| {
            information_criteria(s.log_likelihood, self.spec.n_params(), s.nobs).0
        })
    }

    /// First index with a defined fitted value.
    pub fn first_fitted_index(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.first_index)
    }

    fn state(&self) -> Result<&FittedState> {
        self.state.as_ref().ok_or(ForecastError::ModelNotFitted)
    }

    /// Summary table with standard errors and residual diagnostics.
    pub fn summary(&self) -> Result<ModelSummary> {
        let state = self.state()?;
        let names = self.spec.param_names();
        let mut estimates = state.params.to_flat(&self.spec);
        estimates.push(state.sigma2);

        let coefficients = names
            .into_iter()
            .zip(estimates)
            .zip(&state.std_errors)
            .map(|((name, estimate), &se)| CoefficientEstimate::new(name, estimate, se))
            .collect();

        let innovations = &state.residuals[state.first_index..];
        let (aic, bic, hqic) =
            information_criteria(state.log_likelihood, self.spec.n_params(), state.nobs);

        Ok(ModelSummary {
            model: self.name.clone(),
            nobs: state.nobs,
            log_likelihood: state.log_likelihood,
            aic,
            bic,
            hqic,
            sigma2: state.sigma2,
            coefficients,
            ljung_box: ljung_box(innovations, None, self.spec.n_arma()),
            jarque_bera: jarque_bera(innovations),
            iterations: state.iterations,
        })
    }

    /// Out-of-sample forecasts for `steps` values past the end of the series.
    fn forecast_path(&self, state: &FittedState, steps: usize) -> Vec<f64> {
        let mut w = state.differenced.clone();
        let mut e = state.innovations.clone();
        for _ in 0..steps {
            let prediction = one_step(&w, &e, &state.params, &state.ar_poly, &state.ma_poly);
            w.push(prediction);
            e.push(0.0);
        }
        integrate(&w[state.differenced.len()..], &state.observed, &state.delta)
    }

    /// Moving-average weights of the integrated model, `ψ_0 = 1`.
    fn psi_weights(&self, state: &FittedState, count: usize) -> Vec<f64> {
        let ar_full = {
            let ar: Vec<f64> = std::iter::once(1.0)
                .chain(state.ar_poly.iter().map(|a| -a))
                .collect();
            let diff: Vec<f64> = std::iter::once(1.0)
                .chain(state.delta.iter().map(|d| -d))
                .collect();
            poly_mul(&ar, &diff)
                .into_iter()
                .skip(1)
                .map(|c| -c)
                .collect::<Vec<_>>()
        };

        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut value = state.ma_poly.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi) in ar_full.iter().enumerate().take(j) {
                value += phi * psi[j - 1 - i];
            }
            psi.push(value);
        }
        psi
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &PriceSeries) -> Result<()> {
        self.state = None;
        self.spec.validate(&self.bounds)?;

        let values = series.values();
        let n = values.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }

        let loss = self.spec.differencing_loss();
        if n <= loss {
            return Err(ForecastError::InvalidOrder(format!(
                "differencing consumes {} observations, leaving none of {}",
                loss, n
            )));
        }
        let cycles = self.spec.min_seasonal_length();
        if n < cycles {
            return Err(ForecastError::InsufficientData {
                needed: cycles,
                got: n,
            });
        }
        let needed = self.spec.min_observations();
        if n < needed {
            return Err(ForecastError::InsufficientData { needed, got: n });
        }

        let spec = self.spec;
        let period = spec.seasonal.period;
        let w = seasonal_difference(&difference(values, spec.order.d), spec.seasonal.d, period);
        let start = spec.ar_span();
        let nobs = w.len() - start;

        let mut initial = vec![0.0; spec.n_arma() + usize::from(spec.include_constant)];
        if spec.include_constant {
            initial[0] = mean(&w);
        }

        debug!(
            "fitting {} on {} observations ({} after differencing)",
            self.name,
            n,
            w.len()
        );

        let objective = |u: &[f64]| {
            let params = SarimaParams::from_flat(&spec, &constrain(&spec, u));
            let css = conditional_css(&w, &params, period, start);
            0.5 * (css / nobs as f64).max(f64::MIN_POSITIVE).ln()
        };
        let result = nelder_mead(objective, &initial, self.optimizer.clone());
        if !result.converged {
            return Err(ForecastError::Convergence {
                iterations: result.iterations,
            });
        }

        let constrained = constrain(&spec, &result.optimal_point);
        let params = SarimaParams::from_flat(&spec, &constrained);
        let ar_poly = params.expanded_ar(period);
        let ma_poly = params.expanded_ma(period);
        let innovations = residual_recursion(&w, params.intercept, &ar_poly, &ma_poly, start);
        let css: f64 = innovations[start..].iter().map(|e| e * e).sum();
        let sigma2 = css / nobs as f64;
        let log_likelihood = concentrated_log_likelihood(css, nobs);

        let neg_llf = |theta: &[f64]| {
            let p = SarimaParams::from_flat(&spec, theta);
            -concentrated_log_likelihood(conditional_css(&w, &p, period, start), nobs)
        };
        let mut std_errors = coefficient_std_errors(neg_llf, &constrained);
        std_errors.push((2.0 * sigma2 * sigma2 / nobs as f64).sqrt());

        let first_index = loss + start;
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![f64::NAN; n];
        for t in first_index..n {
            let e = innovations[t - loss];
            residuals[t] = e;
            fitted[t] = values[t] - e;
        }

        debug!(
            "{} converged after {} iterations, sigma2 = {:.6}, llf = {:.3}",
            self.name, result.iterations, sigma2, log_likelihood
        );

        self.state = Some(FittedState {
            observed: values.to_vec(),
            differenced: w,
            params,
            ar_poly,
            ma_poly,
            delta: differencing_polynomial(spec.order.d, spec.seasonal.d, period),
            innovations,
            fitted,
            residuals,
            first_index,
            sigma2,
            log_likelihood,
            nobs,
            std_errors,
            iterations: result.iterations,
        });
        Ok(())
    }

    fn predict_range(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        let state = self.state()?;
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction start {} is after end {}",
                start, end
            )));
        }
        if start < state.first_index {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction start {} precedes the first fitted index {}",
                start, state.first_index
            )));
        }

        let n = state.observed.len();
        let mut out = Vec::with_capacity(end - start + 1);
        if start < n {
            out.extend_from_slice(&state.fitted[start..=end.min(n - 1)]);
        }
        if end >= n {
            let path = self.forecast_path(state, end - n + 1);
            out.extend_from_slice(&path[start.max(n) - n..]);
        }
        Ok(out)
    }

    fn predict_intervals(&self, steps: usize, level: f64) -> Result<PredictionIntervals> {
        let state = self.state()?;
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must be in (0, 1), got {}",
                level
            )));
        }

        let point = self.forecast_path(state, steps);
        let psi = self.psi_weights(state, steps);
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut cumulative = 0.0;
        let (lower, upper): (Vec<f64>, Vec<f64>) = point
            .iter()
            .zip(&psi)
            .map(|(p, w)| {
                cumulative += w * w;
                let half = z * (state.sigma2 * cumulative).sqrt();
                (p - half, p + half)
            })
            .unzip();

        Ok(PredictionIntervals {
            level,
            point,
            lower,
            upper,
        })
    }

    fn nobs(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.observed.len())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One-step prediction of the next differenced value.
fn one_step(w: &[f64], e: &[f64], params: &SarimaParams, ar: &[f64], ma: &[f64]) -> f64 {
    let t = w.len();
    let mut prediction = params.intercept;
    for (i, a) in ar.iter().enumerate() {
        prediction += a * w[t - 1 - i];
    }
    for (j, m) in ma.iter().enumerate() {
        if t > j {
            prediction += m * e[t - 1 - j];
        }
    }
    prediction
}

/// Innovations from `start` onward; earlier entries stay zero.
fn residual_recursion(w: &[f64], intercept: f64, ar: &[f64], ma: &[f64], start: usize) -> Vec<f64> {
    let mut e = vec![0.0; w.len()];
    for t in start..w.len() {
        let mut prediction = intercept;
        for (i, a) in ar.iter().enumerate() {
            prediction += a * w[t - 1 - i];
        }
        for (j, m) in ma.iter().enumerate() {
            if t > j {
                prediction += m * e[t - 1 - j];
            }
        }
        e[t] = w[t] - prediction;
    }
    e
}

fn conditional_css(w: &[f64], params: &SarimaParams, period: usize, start: usize) -> f64 {
    let ar = params.expanded_ar(period);
    let ma = params.expanded_ma(period);
    residual_recursion(w, params.intercept, &ar, &ma, start)[start..]
        .iter()
        .map(|e| e * e)
        .sum()
}

/// Gaussian log-likelihood with `sigma2 = css / n` substituted.
fn concentrated_log_likelihood(css: f64, n: usize) -> f64 {
    let n = n as f64;
    let sigma2 = (css / n).max(f64::MIN_POSITIVE);
    -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + sigma2.ln() + 1.0)
}

/// Square roots of the diagonal of the inverse Hessian, NaN when the Hessian
/// is not positive definite.
fn coefficient_std_errors<F>(neg_llf: F, theta: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if theta.is_empty() {
        return Vec::new();
    }
    let hessian = numerical_hessian(neg_llf, theta);
    match cholesky(&hessian) {
        Some(l) => {
            let cov = cholesky_inverse(&l);
            (0..theta.len()).map(|i| cov[i][i].sqrt()).collect()
        }
        None => {
            debug!("Hessian is not positive definite; standard errors unavailable");
            vec![f64::NAN; theta.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sarima::order::{SarimaOrder, SeasonalOrder};
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use crate::models::sarima::params::is_stationary;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Box-Muller standard normal draw.
    fn gaussian<R: Rng>(rng: &mut R) -> f64 {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn series(values: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        PriceSeries::new("Close", dates, values).unwrap()
    }

    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut values = Vec::with_capacity(n);
        let mut level = 0.0;
        for _ in 0..n {
            level = phi * level + gaussian(&mut rng);
            values.push(level);
        }
        values
    }

    fn random_walk(n: usize, drift: f64, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut level = 100.0;
        (0..n)
            .map(|_| {
                level += drift + gaussian(&mut rng);
                level
            })
            .collect()
    }

    fn spec(p: usize, d: usize, q: usize) -> ModelSpec {
        ModelSpec::new(SarimaOrder::new(p, d, q), SeasonalOrder::none())
    }

    #[test]
    fn recovers_ar1_coefficient() {
        let mut model = Sarima::new(spec(1, 0, 0));
        model.fit(&series(ar1(400, 0.6, 1))).unwrap();

        let phi = model.params().unwrap().ar[0];
        assert!((phi - 0.6).abs() < 0.1, "phi = {}", phi);
        assert!(model.sigma2().unwrap() > 0.7 && model.sigma2().unwrap() < 1.3);

        let summary = model.summary().unwrap();
        let ar = summary.coefficient("ar.L1").unwrap();
        assert!(ar.std_error > 0.0 && ar.std_error < 0.1);
        assert!(ar.p_value < 0.01);
    }

    #[test]
    fn recovers_ma1_coefficient() {
        let mut rng = StdRng::seed_from_u64(5);
        let shocks: Vec<f64> = (0..401).map(|_| gaussian(&mut rng)).collect();
        let values: Vec<f64> = shocks.windows(2).map(|e| e[1] + 0.5 * e[0]).collect();

        let mut model = Sarima::new(spec(0, 0, 1));
        model.fit(&series(values)).unwrap();

        let theta = model.params().unwrap().ma[0];
        assert!((theta - 0.5).abs() < 0.15, "theta = {}", theta);
    }

    #[test]
    fn estimated_polynomials_are_stationary_and_invertible() {
        let mut rng = StdRng::seed_from_u64(3);
        let shocks: Vec<f64> = (0..300).map(|_| gaussian(&mut rng)).collect();
        let mut values = vec![0.0, 0.0];
        for t in 2..300 {
            let next = 0.5 * values[t - 1] - 0.3 * values[t - 2] + shocks[t] + 0.4 * shocks[t - 1];
            values.push(next);
        }

        let mut model = Sarima::new(spec(2, 0, 1));
        model.fit(&series(values)).unwrap();

        let params = model.params().unwrap();
        assert!(is_stationary(&params.ar));
        let ma_as_ar: Vec<f64> = params.ma.iter().map(|t| -t).collect();
        assert!(is_stationary(&ma_as_ar));
        assert!((params.ar[0] - 0.5).abs() < 0.25, "{:?}", params);
    }

    #[test]
    fn predict_range_is_inclusive() {
        let mut model = Sarima::new(spec(1, 1, 1));
        model.fit(&series(random_walk(120, 0.0, 9))).unwrap();

        let n = model.nobs().unwrap();
        assert_eq!(model.predict_range(n, n + 10).unwrap().len(), 11);
        assert_eq!(model.predict_range(n, n).unwrap().len(), 1);
        assert_eq!(model.forecast(1).unwrap().len(), 1);
    }

    #[test]
    fn predict_range_spans_in_and_out_of_sample() {
        let values = random_walk(100, 0.0, 4);
        let mut model = Sarima::new(spec(1, 1, 0));
        model.fit(&series(values)).unwrap();

        let first = model.first_fitted_index().unwrap();
        assert_eq!(first, 2);
        let both = model.predict_range(95, 104).unwrap();
        assert_eq!(both.len(), 10);
        assert_eq!(&both[..5], &model.fitted_values().unwrap()[95..]);
        assert_eq!(&both[5..], model.forecast(5).unwrap().as_slice());
    }

    #[test]
    fn fitted_plus_residual_is_actual() {
        let values = ar1(150, 0.4, 11);
        let mut model = Sarima::new(spec(1, 0, 1));
        model.fit(&series(values.clone())).unwrap();

        let fitted = model.fitted_values().unwrap();
        let residuals = model.residuals().unwrap();
        assert!(fitted[0].is_nan());
        for t in 1..values.len() {
            assert_relative_eq!(fitted[t] + residuals[t], values[t], epsilon = 1e-9);
        }
    }

    #[test]
    fn drift_is_carried_by_the_constant() {
        let values: Vec<f64> = random_walk(300, 0.5, 21);
        let last = *values.last().unwrap();
        let mut model = Sarima::new(spec(0, 1, 0).with_constant(true));
        model.fit(&series(values)).unwrap();

        let forecast = model.forecast(10).unwrap();
        assert!(forecast[9] > last + 2.0, "{} vs {}", forecast[9], last);
        let summary = model.summary().unwrap();
        assert!(summary.coefficient("intercept").is_some());
    }

    #[test]
    fn seasonal_model_follows_the_cycle() {
        let pattern = [3.0, -1.0, 2.0, -4.0];
        let mut rng = StdRng::seed_from_u64(17);
        let values: Vec<f64> = (0..160)
            .map(|i| 50.0 + pattern[i % 4] + 0.1 * gaussian(&mut rng))
            .collect();

        let seasonal = ModelSpec::new(SarimaOrder::new(0, 0, 0), SeasonalOrder::new(1, 1, 0, 4));
        let mut model = Sarima::new(seasonal);
        model.fit(&series(values)).unwrap();

        let forecast = model.forecast(8).unwrap();
        for (h, value) in forecast.iter().enumerate() {
            let expected = 50.0 + pattern[(160 + h) % 4];
            assert!((value - expected).abs() < 1.0, "h = {}: {}", h, value);
        }
        assert_eq!(model.name(), "SARIMAX(0, 0, 0)x(1, 1, 0, 4)");
    }

    #[test]
    fn intervals_widen_with_horizon() {
        let mut model = Sarima::new(spec(1, 1, 1));
        model.fit(&series(random_walk(150, 0.0, 2))).unwrap();

        let intervals = model.predict_intervals(12, 0.95).unwrap();
        assert_eq!(intervals.len(), 12);
        let widths: Vec<f64> = intervals
            .upper
            .iter()
            .zip(&intervals.lower)
            .map(|(u, l)| u - l)
            .collect();
        for pair in widths.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9);
        }
        assert_eq!(intervals.point, model.forecast(12).unwrap());

        assert!(matches!(
            model.predict_intervals(5, 1.5),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn white_noise_interval_matches_sigma() {
        let mut model = Sarima::new(spec(0, 0, 0).with_constant(true));
        model.fit(&series(ar1(300, 0.0, 8))).unwrap();

        let sigma = model.sigma2().unwrap().sqrt();
        let intervals = model.predict_intervals(3, 0.95).unwrap();
        for (u, p) in intervals.upper.iter().zip(&intervals.point) {
            assert_relative_eq!(u - p, 1.959964 * sigma, epsilon = 1e-4);
        }
    }

    #[test]
    fn requires_fit() {
        let model = Sarima::new(spec(1, 1, 1));
        assert!(!model.is_fitted());
        assert_eq!(model.predict_range(0, 5), Err(ForecastError::ModelNotFitted));
        assert_eq!(model.forecast(3), Err(ForecastError::ModelNotFitted));
        assert!(matches!(model.summary(), Err(ForecastError::ModelNotFitted)));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let mut model = Sarima::new(spec(1, 0, 0));
        model.fit(&series(ar1(60, 0.3, 6))).unwrap();

        assert!(matches!(
            model.predict_range(10, 5),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            model.predict_range(0, 5),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn order_and_length_errors() {
        let short = series(ar1(16, 0.3, 1));

        let mut over_differenced = Sarima::new(ModelSpec::new(
            SarimaOrder::new(0, 1, 0),
            SeasonalOrder::new(0, 2, 0, 12),
        ));
        assert!(matches!(
            over_differenced.fit(&short),
            Err(ForecastError::InvalidOrder(_))
        ));

        let mut too_many = Sarima::new(spec(5, 1, 5));
        assert!(matches!(
            too_many.fit(&short),
            Err(ForecastError::InsufficientData { .. })
        ));

        let mut one_cycle = Sarima::new(ModelSpec::new(
            SarimaOrder::new(1, 0, 0),
            SeasonalOrder::new(1, 0, 0, 12),
        ));
        assert_eq!(
            one_cycle.fit(&short),
            Err(ForecastError::InsufficientData { needed: 24, got: 16 })
        );

        let mut out_of_bounds = Sarima::new(spec(6, 0, 0));
        assert!(matches!(
            out_of_bounds.fit(&short),
            Err(ForecastError::InvalidOrder(_))
        ));
    }

    #[test]
    fn exhausted_budget_is_a_convergence_error() {
        let mut model = Sarima::new(spec(2, 0, 2)).with_optimizer(NelderMeadConfig {
            max_iter: 2,
            tolerance: 1e-14,
            ..Default::default()
        });
        assert_eq!(
            model.fit(&series(ar1(100, 0.5, 2))),
            Err(ForecastError::Convergence { iterations: 2 })
        );
        assert!(!model.is_fitted());
    }

    #[test]
    fn summary_reports_information_criteria() {
        let mut model = Sarima::new(spec(1, 0, 0));
        model.fit(&series(ar1(200, 0.5, 13))).unwrap();
        let summary = model.summary().unwrap();

        assert_eq!(summary.nobs, 199);
        assert_eq!(summary.coefficients.len(), 2);
        assert_relative_eq!(summary.aic, -2.0 * summary.log_likelihood + 4.0, epsilon = 1e-9);
        assert!(summary.bic > summary.aic);
        assert_eq!(model.aic(), Some(summary.aic));
        assert!(summary.ljung_box.statistic.is_finite());
    }
}
