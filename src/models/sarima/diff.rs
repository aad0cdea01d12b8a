//! Differencing utilities for SARIMA models.

/// Apply differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing of lag `period`, `d` times.
///
/// Returns an empty series once fewer than `period + 1` values remain.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Coefficients `δ_k` of the combined differencing operator
/// `(1 - L)^d (1 - L^s)^D = 1 - Σ δ_k L^k`.
///
/// Element `k - 1` of the result is `δ_k`, so the undifferenced series obeys
/// `y_t = w_t + Σ δ_k y_{t-k}`.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = poly_mul(&poly, &seasonal);
        }
    }
    poly.iter().skip(1).map(|c| -c).collect()
}

/// Undo differencing for values that follow the end of `history`.
///
/// `differenced` continues the differenced series; each value is mapped back
/// with `y_t = w_t + Σ δ_k y_{t-k}`, feeding earlier results forward.
pub fn integrate(differenced: &[f64], history: &[f64], delta: &[f64]) -> Vec<f64> {
    if delta.is_empty() {
        return differenced.to_vec();
    }
    let mut extended = history.to_vec();
    for &w in differenced {
        let t = extended.len();
        let carried: f64 = delta
            .iter()
            .enumerate()
            .filter(|(k, _)| t > *k)
            .map(|(k, dk)| dk * extended[t - 1 - k])
            .sum();
        extended.push(w + carried);
    }
    extended.split_off(history.len())
}

/// Multiply two polynomials given by coefficients in ascending lag order.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}
