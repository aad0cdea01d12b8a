//! Statistical utility functions.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Quantile function of the standard normal distribution.
///
/// # Example
/// ```
/// use stock_forecast::utils::stats::quantile_normal;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Two-sided p-value of a standard normal test statistic.
pub fn two_sided_normal_p(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    2.0 * (1.0 - normal_cdf(z.abs()))
}

/// Survival function `P(X > x)` of a chi-squared distribution.
pub fn chi_squared_sf(x: f64, df: usize) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 || df == 0 {
        return 1.0;
    }
    match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the defined entries, `None` when nothing is defined.
pub fn mean_defined<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Moment-based skewness (biased estimator, as in Jarque-Bera).
pub fn skewness(values: &[f64]) -> f64 {
    let (m2, m3, _) = central_moments(values);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    m3 / m2.powf(1.5)
}

/// Moment-based (non-excess) kurtosis.
pub fn kurtosis(values: &[f64]) -> f64 {
    let (m2, _, m4) = central_moments(values);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    m4 / (m2 * m2)
}

fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN, f64::NAN);
    }
    let m = mean(values);
    let n = values.len() as f64;
    let (m2, m3, m4) = values.iter().fold((0.0, 0.0, 0.0), |(a, b, c), x| {
        let d = x - m;
        (a + d * d, b + d * d * d, c + d * d * d * d)
    });
    (m2 / n, m3 / n, m4 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 1e-6);
        assert_relative_eq!(quantile_normal(0.975), 1.96, epsilon = 0.01);
        assert_relative_eq!(quantile_normal(0.025), -1.96, epsilon = 0.01);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn normal_cdf_and_p_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(two_sided_normal_p(1.959964), 0.05, epsilon = 1e-4);
        assert!(two_sided_normal_p(f64::NAN).is_nan());
    }

    #[test]
    fn chi_squared_sf_known_values() {
        // df = 2 is exponential with mean 2: P(X > 2) = e^-1
        assert_relative_eq!(chi_squared_sf(2.0, 2), (-1.0f64).exp(), epsilon = 1e-8);
        // df = 10: P(X > 18.307) ≈ 0.05
        assert_relative_eq!(chi_squared_sf(18.307, 10), 0.05, epsilon = 1e-3);
        assert_eq!(chi_squared_sf(0.0, 5), 1.0);
    }

    #[test]
    fn mean_and_variance() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn mean_defined_skips_missing() {
        let values = [None, Some(1.0), Some(3.0), None];
        assert_eq!(mean_defined(&values), Some(2.0));
        assert_eq!(mean_defined(&[None, None]), None);
    }

    #[test]
    fn symmetric_data_has_zero_skew() {
        let values = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&values), 0.0, epsilon = 1e-12);
        // Uniform-ish spread is platykurtic
        assert!(kurtosis(&values) < 3.0);
        assert!(skewness(&[1.0, 1.0, 1.0]).is_nan());
    }
}
